use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Lenient parse: anything unrecognized becomes the default difficulty.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            log::warn!("{}, falling back to {}", err, Self::default());
            Self::default()
        })
    }

    /// Picks the value for this difficulty out of `(easy, medium, hard)`.
    pub fn pick<T>(self, (easy, medium, hard): (T, T, T)) -> T {
        match self {
            Self::Easy => easy,
            Self::Medium => medium,
            Self::Hard => hard,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> core::result::Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(Difficulty::parse_or_default)
        .unwrap_or_default())
}

/// Read-only settings handed to a game at construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            seed: None,
        }
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| GameError::MalformedConfig(err.to_string()))
    }

    /// Fresh random source for one session. A fixed seed gives the same sequence every time.
    pub fn rng(&self) -> GameRng {
        GameRng::new(self.seed.unwrap_or_else(clock_seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        assert_eq!(Difficulty::parse_or_default("nightmare"), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default("easy"), Difficulty::Easy);
    }

    #[test]
    fn json_config_is_lenient_about_difficulty() {
        let config = GameConfig::from_json(r#"{"difficulty": "insane", "seed": 9}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.seed, Some(9));

        let config = GameConfig::from_json(r#"{"difficulty": "hard"}"#).unwrap();
        assert_eq!(config, GameConfig::new(Difficulty::Hard));

        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("difficulty=hard"),
            Err(GameError::MalformedConfig(_))
        ));
    }

    #[test]
    fn seeded_config_repeats() {
        let config = GameConfig::new(Difficulty::Easy).with_seed(11);
        assert_eq!(config.rng().below(1 << 20), config.rng().below(1 << 20));
    }
}
