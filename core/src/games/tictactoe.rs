use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

const SIDE: Coord = 3;

const LINES: [[CellIndex; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// 3x3 board; the human plays X, the computer plays O.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeBoard {
    cells: Board<Option<Player>>,
}

impl Default for TicTacToeBoard {
    fn default() -> Self {
        Self {
            cells: Board::new((SIDE, SIDE)),
        }
    }
}

impl TicTacToeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, index: CellIndex) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.cells.count(Option::is_some)
    }

    /// Places a mark if the cell exists, is empty, and the game is still open.
    pub fn place(&mut self, index: CellIndex, player: Player) -> MoveOutcome {
        if self.status().is_terminal() {
            return MoveOutcome::Rejected;
        }
        match self.cells.get_mut(index) {
            Some(cell) if cell.is_none() => {
                *cell = Some(player);
                MoveOutcome::Applied
            }
            _ => MoveOutcome::Rejected,
        }
    }

    /// The first completed line, if any.
    pub fn winning_line(&self) -> Option<(Player, [CellIndex; 3])> {
        LINES.into_iter().find_map(|line| {
            let [a, b, c] = line.map(|index| self.cell(index));
            match a {
                Some(player) if b == a && c == a => Some((player, line)),
                _ => None,
            }
        })
    }
}

impl Adversarial for TicTacToeBoard {
    type Move = CellIndex;

    fn legal_moves(&self) -> Vec<CellIndex> {
        if self.status().is_terminal() {
            return Vec::new();
        }
        self.cells
            .indexed()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    fn play(&mut self, index: CellIndex, player: Player) {
        self.cells[index] = Some(player);
    }

    fn unplay(&mut self, index: CellIndex) {
        self.cells[index] = None;
    }

    fn status(&self) -> Status {
        if let Some((player, _)) = self.winning_line() {
            Status::Win(player)
        } else if self.occupied() == self.cells.len() {
            Status::Draw
        } else {
            Status::Ongoing
        }
    }
}

impl VersusRules for TicTacToeBoard {
    const ID: &'static str = "tic-tac-toe";
    const STRATEGY: Strategy = Strategy::Minimax;

    fn read_input(&self, input: Input) -> Option<CellIndex> {
        match input {
            Input::Cell(index) => Some(index),
            _ => None,
        }
    }

    fn result(status: Status) -> GameResult {
        match status {
            Status::Win(Player::Human) => GameResult::won(100).with_message("You win!"),
            Status::Win(Player::Computer) => GameResult::lost(0).with_message("The computer wins"),
            _ => GameResult::won(50).with_message("It's a draw"),
        }
    }
}
