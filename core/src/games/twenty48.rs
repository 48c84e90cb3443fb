use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

const SIDE: Coord = 4;
const START_TILES: usize = 2;
const FOUR_CHANCE: f64 = 0.1;

pub const WINNING_TILE: u32 = 2048;

type Line<T> = SmallVec<[T; 8]>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutcome {
    /// At least one tile changed position or merged.
    pub moved: bool,
    /// Sum of the tiles produced by merges.
    pub gained: u32,
}

impl core::ops::BitOr for SlideOutcome {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            moved: self.moved || rhs.moved,
            gained: self.gained.saturating_add(rhs.gained),
        }
    }
}

/// Slides a line toward index 0. A tile produced by a merge never merges again in the same call.
pub fn merge_line(line: &mut [u32]) -> SlideOutcome {
    let mut tiles = line.iter().copied().filter(|&tile| tile != 0).peekable();
    let mut packed: Line<u32> = SmallVec::new();
    let mut gained = 0;

    while let Some(tile) = tiles.next() {
        if tiles.next_if_eq(&tile).is_some() {
            let doubled = tile.saturating_mul(2);
            packed.push(doubled);
            gained = doubled.saturating_add(gained);
        } else {
            packed.push(tile);
        }
    }
    packed.resize(line.len(), 0);

    let moved = packed.as_slice() != &*line;
    line.copy_from_slice(&packed);
    SlideOutcome { moved, gained }
}

/// Grid of tile values, zero is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBoard {
    cells: Board<u32>,
}

impl Default for TileBoard {
    fn default() -> Self {
        Self {
            cells: Board::new((SIDE, SIDE)),
        }
    }
}

impl TileBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(size: Coord2, cells: Vec<u32>) -> Result<Self> {
        Ok(Self {
            cells: Board::from_cells(size, cells)?,
        })
    }

    pub fn tile(&self, index: CellIndex) -> u32 {
        self.cells.get(index).copied().unwrap_or_default()
    }

    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().copied()
    }

    pub fn max_tile(&self) -> u32 {
        self.tiles().max().unwrap_or_default()
    }

    pub fn empty_cells(&self) -> Vec<CellIndex> {
        self.cells
            .indexed()
            .filter(|&(_, &tile)| tile == 0)
            .map(|(index, _)| index)
            .collect()
    }

    /// Cell indices of every line for `dir`, each starting at the edge `dir` points to.
    fn lines(&self, dir: Direction) -> impl Iterator<Item = Line<CellIndex>> + '_ {
        let (rows, cols) = self.cells.size();
        let (count, length) = match dir {
            Direction::Left | Direction::Right => (rows, cols),
            Direction::Up | Direction::Down => (cols, rows),
        };

        (0..count).map(move |k| {
            (0..length)
                .map(|i| match dir {
                    Direction::Left => (k, i),
                    Direction::Right => (k, length - 1 - i),
                    Direction::Up => (i, k),
                    Direction::Down => (length - 1 - i, k),
                })
                .filter_map(|coords| self.cells.index_of(coords))
                .collect()
        })
    }

    /// Slides every line toward `dir`, the board is untouched when nothing can move.
    pub fn slide(&mut self, dir: Direction) -> SlideOutcome {
        let lines: Vec<_> = self.lines(dir).collect();
        let mut outcome = SlideOutcome::default();

        for indices in lines {
            let mut values: Line<u32> = indices.iter().map(|&index| self.cells[index]).collect();
            outcome = outcome | merge_line(&mut values);
            for (&index, &value) in indices.iter().zip(&values) {
                self.cells[index] = value;
            }
        }
        outcome
    }

    /// Whether any direction would displace or merge a tile.
    pub fn can_move(&self) -> bool {
        self.cells.indexed().any(|(index, &tile)| {
            tile == 0 || self.cells.orthogonal(index).any(|other| self.cells[other] == tile)
        })
    }

    pub fn status(&self) -> Status {
        if self.max_tile() >= WINNING_TILE {
            Status::Win(Player::Human)
        } else if !self.can_move() {
            Status::Loss
        } else {
            Status::Ongoing
        }
    }

    /// Places a 2 (or, less often, a 4) on a random empty cell.
    pub fn spawn(&mut self, rng: &mut GameRng) -> Option<CellIndex> {
        let &index = rng.pick(&self.empty_cells())?;
        self.cells[index] = if rng.chance(FOUR_CHANCE) { 4 } else { 2 };
        Some(index)
    }
}

pub struct Twenty48 {
    session: Session<()>,
    board: TileBoard,
    rng: GameRng,
}

impl Twenty48 {
    pub const ID: &'static str = "2048";

    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            rng: config.rng(),
            session: Session::new(Self::ID, config, reporter),
            board: TileBoard::new(),
        }
    }

    pub fn board(&self) -> &TileBoard {
        &self.board
    }

    pub fn slide(&mut self, dir: Direction) -> MoveOutcome {
        if !self.session.is_playing() {
            return MoveOutcome::Rejected;
        }

        let outcome = self.board.slide(dir);
        if !outcome.moved {
            return MoveOutcome::Rejected;
        }
        log::trace!("2048: slide {:?} gained {}", dir, outcome.gained);
        self.session.add_score(outcome.gained);
        self.board.spawn(&mut self.rng);

        let result = match self.board.status() {
            Status::Ongoing => return MoveOutcome::Applied,
            Status::Win(_) => GameResult::won(self.session.score()).with_message("You made 2048!"),
            _ => GameResult::lost(self.session.score()).with_message("No moves left"),
        };
        self.session.finish(result);
        MoveOutcome::Finished
    }
}

impl Game for Twenty48 {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn start(&mut self) {
        if !self.session.begin() {
            return;
        }
        self.board = TileBoard::new();
        for _ in 0..START_TILES {
            self.board.spawn(&mut self.rng);
        }
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn destroy(&mut self) {
        self.session.teardown();
    }

    fn handle_input(&mut self, input: Input) -> MoveOutcome {
        match input {
            Input::Slide(dir) => self.slide(dir),
            _ => MoveOutcome::Rejected,
        }
    }

    fn score(&self) -> u32 {
        self.session.score()
    }

    fn status(&self) -> Status {
        self.board.status()
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }
}
