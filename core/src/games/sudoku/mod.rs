use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub use generator::*;

mod generator;
mod solver;

const SIDE: Coord = 9;
const BOX: usize = 3;
const EMPTY: u8 = 0;

/// 9x9 digit grid, `0` marks an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuGrid {
    cells: Board<u8>,
}

impl Default for SudokuGrid {
    fn default() -> Self {
        Self {
            cells: Board::new((SIDE, SIDE)),
        }
    }
}

impl SudokuGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grid from 81 row-major digits in `0..=9`.
    pub fn from_digits(digits: Vec<u8>) -> Result<Self> {
        if digits.iter().any(|&digit| digit > 9) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            cells: Board::from_cells((SIDE, SIDE), digits)?,
        })
    }

    pub fn get(&self, index: CellIndex) -> Option<u8> {
        self.cells.get(index).copied()
    }

    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().copied()
    }

    pub fn filled(&self) -> usize {
        self.cells.count(|&digit| digit != EMPTY)
    }

    pub fn is_full(&self) -> bool {
        self.filled() == self.cells.len()
    }

    fn set(&mut self, index: CellIndex, digit: u8) {
        self.cells[index] = digit;
    }
}

pub struct Sudoku {
    session: Session<()>,
    holes: usize,
    puzzle: Puzzle,
    board: SudokuGrid,
    rng: GameRng,
}

impl Sudoku {
    pub const ID: &'static str = "sudoku";

    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            holes: config.difficulty.pick((30, 45, 55)),
            rng: config.rng(),
            session: Session::new(Self::ID, config, reporter),
            puzzle: Puzzle::default(),
            board: SudokuGrid::empty(),
        }
    }

    pub fn board(&self) -> &SudokuGrid {
        &self.board
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn is_given(&self, index: CellIndex) -> bool {
        self.puzzle.givens.get(index).is_some_and(|digit| digit != EMPTY)
    }

    /// Filled cells that disagree with the retained solution.
    pub fn mistakes(&self) -> Vec<CellIndex> {
        self.board
            .digits()
            .zip(self.puzzle.solution.digits())
            .enumerate()
            .filter(|&(_, (entry, answer))| entry != EMPTY && entry != answer)
            .map(|(index, _)| index)
            .collect()
    }

    /// Writes `digit` into an open cell; `0` clears it. Givens never change.
    pub fn enter(&mut self, index: CellIndex, digit: u8) -> MoveOutcome {
        if !self.session.is_playing() || digit > 9 || self.is_given(index) {
            return MoveOutcome::Rejected;
        }
        match self.board.get(index) {
            Some(current) if current != digit => {
                self.board.set(index, digit);
                MoveOutcome::Applied
            }
            _ => MoveOutcome::Rejected,
        }
    }

    /// Finishes the game when the board is complete and valid, otherwise leaves it running.
    pub fn submit(&mut self) -> MoveOutcome {
        if !self.session.is_playing() {
            return MoveOutcome::Rejected;
        }
        if !self.board.is_solved() {
            log::debug!("sudoku: submitted with {} mistakes", self.mistakes().len());
            return MoveOutcome::Rejected;
        }

        let result = GameResult::won(500).with_message("Puzzle solved!");
        self.session.set_score(result.score);
        self.session.finish(result);
        MoveOutcome::Finished
    }
}

impl Game for Sudoku {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn start(&mut self) {
        if !self.session.begin() {
            return;
        }
        self.puzzle = Puzzle::generate(self.holes, &mut self.rng);
        self.board = self.puzzle.givens.clone();
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn destroy(&mut self) {
        self.session.teardown();
    }

    fn handle_input(&mut self, input: Input) -> MoveOutcome {
        match input {
            Input::Digit { cell, digit } => self.enter(cell, digit),
            Input::Submit => self.submit(),
            _ => MoveOutcome::Rejected,
        }
    }

    fn score(&self) -> u32 {
        self.session.score()
    }

    fn status(&self) -> Status {
        if self.session.phase() == Phase::Over && self.board.is_solved() {
            Status::Win(Player::Human)
        } else {
            Status::Ongoing
        }
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }
}
