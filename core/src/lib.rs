#![no_std]

extern crate alloc;

use alloc::string::String;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use config::*;
pub use error::*;
pub use games::*;
pub use rng::*;
pub use search::*;
pub use session::*;
pub use timers::*;
pub use types::*;

mod board;
mod config;
mod error;
mod games;
mod rng;
mod search;
mod session;
mod timers;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }
}

/// Result of evaluating a board. Single-player puzzles report `Win(Player::Human)` when solved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Ongoing,
    Win(Player),
    Draw,
    Loss,
}

impl Status {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Rejected,
    Applied,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u32,
    pub won: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GameResult {
    pub const fn won(score: u32) -> Self {
        Self {
            score,
            won: true,
            message: None,
        }
    }

    pub const fn lost(score: u32) -> Self {
        Self {
            score,
            won: false,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_without_empty_message() {
        let json = serde_json::to_string(&GameResult::won(50)).unwrap();
        assert_eq!(json, r#"{"score":50,"won":true}"#);

        let result: GameResult =
            serde_json::from_str(r#"{"score":0,"won":false,"message":"Boom"}"#).unwrap();
        assert_eq!(result, GameResult::lost(0).with_message("Boom"));
    }

    #[test]
    fn only_ongoing_is_not_terminal() {
        assert!(!Status::Ongoing.is_terminal());
        assert!(Status::Draw.is_terminal());
        assert!(Status::Win(Player::Computer).is_terminal());
        assert_eq!(Player::Human.other(), Player::Computer);
    }
}
