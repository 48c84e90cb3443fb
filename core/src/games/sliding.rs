use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

const BLANK: u8 = 0;
/// Largest side whose tile numbers all fit in a `u8`.
const MAX_SIDE: Coord = 16;
const MAX_SHUFFLE_ATTEMPTS: usize = 8;

/// Square puzzle of numbered tiles and one blank. Solved is `1, 2, .., n - 1` row by row with
/// the blank in the last cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingBoard {
    tiles: Board<u8>,
    blank: CellIndex,
}

impl SlidingBoard {
    pub fn solved(side: Coord) -> Self {
        let side = side.clamp(2, MAX_SIDE);
        let count = usize::from(side) * usize::from(side);
        let mut tiles: Board<u8> = Board::new((side, side));
        for (index, number) in (1..=u8::MAX).take(count - 1).enumerate() {
            tiles[index] = number;
        }
        Self {
            tiles,
            blank: count - 1,
        }
    }

    /// Board from row-major tile numbers; they must be exactly `0..side * side`, 0 being the blank.
    pub fn from_tiles(side: Coord, tiles: Vec<u8>) -> Result<Self> {
        if side > MAX_SIDE {
            return Err(GameError::InvalidBoardShape);
        }
        let mut seen: Vec<u8> = tiles.clone();
        seen.sort_unstable();
        if seen.iter().enumerate().any(|(expected, &tile)| usize::from(tile) != expected) {
            return Err(GameError::InvalidBoardShape);
        }

        let tiles = Board::from_cells((side, side), tiles)?;
        let blank = tiles
            .indexed()
            .find(|&(_, &tile)| tile == BLANK)
            .map(|(index, _)| index)
            .ok_or(GameError::InvalidBoardShape)?;
        Ok(Self { tiles, blank })
    }

    pub fn side(&self) -> Coord {
        self.tiles.cols()
    }

    pub fn blank(&self) -> CellIndex {
        self.blank
    }

    pub fn tile(&self, index: CellIndex) -> Option<u8> {
        self.tiles.get(index).copied()
    }

    pub fn tiles(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiles.iter().copied()
    }

    pub fn can_move(&self, index: CellIndex) -> bool {
        self.tiles.orthogonal(self.blank).any(|next| next == index)
    }

    /// Moves the tile at `index` into the blank; only tiles next to the blank can move.
    pub fn move_tile(&mut self, index: CellIndex) -> bool {
        if !self.can_move(index) {
            return false;
        }
        self.tiles.swap(index, self.blank);
        self.blank = index;
        true
    }

    /// Moves the tile that can travel in `dir`, returning where it came from.
    pub fn slide(&mut self, dir: Direction) -> Option<CellIndex> {
        let from = self.tiles.step(self.blank, dir.opposite())?;
        self.move_tile(from).then_some(from)
    }

    pub fn is_solved(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles.indexed().all(|(index, &tile)| {
            if index == last {
                tile == BLANK
            } else {
                usize::from(tile) == index + 1
            }
        })
    }

    /// Inversion parity test. Odd widths need an even inversion count; even widths also count
    /// the blank's row from the bottom and need the sum to be odd.
    pub fn is_solvable(&self) -> bool {
        let numbered: Vec<u8> = self.tiles().filter(|&tile| tile != BLANK).collect();
        let inversions: usize = numbered
            .iter()
            .enumerate()
            .map(|(i, &a)| numbered[i + 1..].iter().filter(|&&b| b < a).count())
            .sum();

        let side = usize::from(self.side());
        if side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row_from_bottom = side - self.blank / side;
            (inversions + blank_row_from_bottom) % 2 == 1
        }
    }

    /// Random walk of the blank that never undoes the step it just took, so the board stays in
    /// the solvable class it started in.
    pub fn shuffle(&mut self, moves: usize, rng: &mut GameRng) {
        let mut previous: Option<CellIndex> = None;
        for _ in 0..moves {
            let candidates: SmallVec<[CellIndex; 4]> = self
                .tiles
                .orthogonal(self.blank)
                .filter(|&next| Some(next) != previous)
                .collect();
            let Some(&next) = rng.pick(&candidates) else {
                break;
            };
            previous = Some(self.blank);
            self.move_tile(next);
        }
    }
}

pub struct SlidingPuzzle {
    session: Session<()>,
    board: SlidingBoard,
    moves: u32,
    rng: GameRng,
}

impl SlidingPuzzle {
    pub const ID: &'static str = "sliding-puzzle";

    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        let side = config.difficulty.pick((3, 4, 5));
        Self {
            rng: config.rng(),
            session: Session::new(Self::ID, config, reporter),
            board: SlidingBoard::solved(side),
            moves: 0,
        }
    }

    pub fn board(&self) -> &SlidingBoard {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn shuffle_length(side: Coord) -> usize {
        if side == 3 { 100 } else { 300 }
    }

    fn after_move(&mut self, moved: bool) -> MoveOutcome {
        if !moved {
            return MoveOutcome::Rejected;
        }
        self.moves += 1;
        if !self.board.is_solved() {
            return MoveOutcome::Applied;
        }

        let score = 1000u32.saturating_sub(2 * self.moves);
        self.session.set_score(score);
        self.session.finish(GameResult::won(score).with_message("Puzzle solved!"));
        MoveOutcome::Finished
    }
}

impl Game for SlidingPuzzle {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn start(&mut self) {
        if !self.session.begin() {
            return;
        }
        self.moves = 0;

        let side = self.board.side();
        self.board = SlidingBoard::solved(side);
        for _ in 0..MAX_SHUFFLE_ATTEMPTS {
            self.board.shuffle(Self::shuffle_length(side), &mut self.rng);
            if !self.board.is_solved() {
                return;
            }
        }
        log::warn!("sliding-puzzle: shuffle kept landing on the solved board");
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn destroy(&mut self) {
        self.session.teardown();
    }

    fn handle_input(&mut self, input: Input) -> MoveOutcome {
        if !self.session.is_playing() {
            return MoveOutcome::Rejected;
        }
        let moved = match input {
            Input::Cell(index) => self.board.move_tile(index),
            Input::Slide(dir) => self.board.slide(dir).is_some(),
            _ => return MoveOutcome::Rejected,
        };
        self.after_move(moved)
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
