use alloc::boxed::Box;
use core::ops::Index;
use serde::{Deserialize, Serialize};

use crate::*;

pub use engine::*;
pub use generator::*;

mod engine;
mod generator;

/// Field dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl FieldConfig {
    pub const EASY: Self = Self::new_unchecked((8, 8), 10);
    pub const MEDIUM: Self = Self::new_unchecked((10, 10), 18);
    pub const HARD: Self = Self::new_unchecked((12, 12), 25);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// A field must be non-empty and leave room for a safe first click.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if mines >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        difficulty.pick((Self::EASY, Self::MEDIUM, Self::HARD))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Where the mines are, with every cell's neighbouring mine count worked out once up front.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Board<bool>,
    counts: Board<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Board<bool>) -> Self {
        let mut counts: Board<u8> = Board::new(mines.size());
        for index in 0..mines.len() {
            // at most eight neighbours
            counts[index] = mines.neighbors(index).filter(|&other| mines[other]).count() as u8;
        }
        let mine_count = mines.count(|&is_mine| is_mine) as CellCount;
        Self {
            mines,
            counts,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Board<bool> = Board::new(size);
        for &coords in mine_coords {
            let index = mines.index_of(coords).ok_or(GameError::InvalidCoords)?;
            mines[index] = true;
        }
        Ok(Self::from_mine_mask(mines))
    }

    pub fn field_config(&self) -> FieldConfig {
        FieldConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        self.mines.size()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self.mines.get(index).copied().unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        self.counts.get(index).copied().unwrap_or_default()
    }

    pub(crate) fn iter_neighbors(
        &self,
        index: CellIndex,
    ) -> impl Iterator<Item = CellIndex> + use<> {
        self.mines.neighbors(index)
    }
}

impl Index<CellIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mines[index]
    }
}

pub struct Minesweeper {
    session: Session<()>,
    field: FieldConfig,
    engine: PlayEngine,
    rng: GameRng,
}

impl Minesweeper {
    pub const ID: &'static str = "minesweeper";

    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        let field = FieldConfig::for_difficulty(config.difficulty);
        Self {
            rng: config.rng(),
            session: Session::new(Self::ID, config, reporter),
            field,
            engine: PlayEngine::new(field),
        }
    }

    pub fn field(&self) -> FieldConfig {
        self.field
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn reveal(&mut self, index: CellIndex) -> MoveOutcome {
        if !self.session.is_playing() {
            return MoveOutcome::Rejected;
        }

        let result = match self.engine.reveal(index, &mut self.rng) {
            RevealOutcome::NoChange => return MoveOutcome::Rejected,
            RevealOutcome::Revealed => return MoveOutcome::Applied,
            RevealOutcome::Won => {
                let score = u32::from(self.engine.total_mines()) * 100;
                GameResult::won(score).with_message("Field cleared!")
            }
            RevealOutcome::HitMine => GameResult::lost(0).with_message("Boom"),
        };
        self.session.set_score(result.score);
        self.session.finish(result);
        MoveOutcome::Finished
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> MoveOutcome {
        if !self.session.is_playing() {
            return MoveOutcome::Rejected;
        }
        match self.engine.toggle_flag(index) {
            MarkOutcome::Changed => MoveOutcome::Applied,
            MarkOutcome::NoChange => MoveOutcome::Rejected,
        }
    }
}

impl Game for Minesweeper {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn start(&mut self) {
        if !self.session.begin() {
            return;
        }
        self.engine = PlayEngine::new(self.field);
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn destroy(&mut self) {
        self.session.teardown();
    }

    fn handle_input(&mut self, input: Input) -> MoveOutcome {
        match input {
            Input::Cell(index) => self.reveal(index),
            Input::Flag(index) => self.toggle_flag(index),
            _ => MoveOutcome::Rejected,
        }
    }

    fn score(&self) -> u32 {
        self.session.score()
    }

    fn status(&self) -> Status {
        self.engine.status()
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }
}
