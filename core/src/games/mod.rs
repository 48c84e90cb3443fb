use alloc::boxed::Box;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

pub use connect4::*;
pub use minesweeper::*;
pub use sliding::*;
pub use sudoku::*;
pub use tictactoe::*;
pub use twenty48::*;
pub use versus::*;

mod connect4;
mod minesweeper;
mod sliding;
mod sudoku;
mod tictactoe;
mod twenty48;
mod versus;

/// A discrete input event delivered by the host. Games reject inputs they have no use for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Cell(CellIndex),
    Flag(CellIndex),
    Column(usize),
    Slide(Direction),
    Digit { cell: CellIndex, digit: u8 },
    Submit,
}

/// Capability interface every game exposes to the hub shell.
pub trait Game {
    fn id(&self) -> &'static str;

    /// One-time setup before the first session.
    fn init(&mut self) {}

    /// Resets the board and begins a new session, cancelling anything left over from the last.
    fn start(&mut self);

    /// Cancels pending timers and stops accepting input, the board is kept.
    fn stop(&mut self);

    /// Full teardown, the game accepts nothing afterwards.
    fn destroy(&mut self);

    fn handle_input(&mut self, input: Input) -> MoveOutcome;

    /// Advances the session clock, running whatever was scheduled in that window.
    fn advance(&mut self, _elapsed: Duration) {}

    fn score(&self) -> u32;

    fn status(&self) -> Status;

    fn phase(&self) -> Phase;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
    Twenty48,
    Minesweeper,
    SlidingPuzzle,
    Sudoku,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        Self::TicTacToe,
        Self::ConnectFour,
        Self::Twenty48,
        Self::Minesweeper,
        Self::SlidingPuzzle,
        Self::Sudoku,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::TicTacToe => TicTacToeBoard::ID,
            Self::ConnectFour => ConnectFourBoard::ID,
            Self::Twenty48 => Twenty48::ID,
            Self::Minesweeper => Minesweeper::ID,
            Self::SlidingPuzzle => SlidingPuzzle::ID,
            Self::Sudoku => Sudoku::ID,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn create(self, config: GameConfig, reporter: Box<dyn Reporter>) -> Box<dyn Game> {
        match self {
            Self::TicTacToe => Box::new(TicTacToe::new(config, reporter)),
            Self::ConnectFour => Box::new(ConnectFour::new(config, reporter)),
            Self::Twenty48 => Box::new(Twenty48::new(config, reporter)),
            Self::Minesweeper => Box::new(Minesweeper::new(config, reporter)),
            Self::SlidingPuzzle => Box::new(SlidingPuzzle::new(config, reporter)),
            Self::Sudoku => Box::new(Sudoku::new(config, reporter)),
        }
    }
}
