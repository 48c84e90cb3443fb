use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

const ROWS: Coord = 6;
const COLS: Coord = 7;
const CONNECT: usize = 4;

/// Directions a winning window can run in; the other four are the same windows read backwards.
const WINDOWS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Gravity board, row 0 is the top. The human drops red, the computer yellow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourBoard {
    cells: Board<Option<Player>>,
}

impl Default for ConnectFourBoard {
    fn default() -> Self {
        Self {
            cells: Board::new((ROWS, COLS)),
        }
    }
}

impl ConnectFourBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Coord2 {
        self.cells.size()
    }

    pub fn cell(&self, coords: Coord2) -> Option<Player> {
        self.cells.at(coords).copied().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.cells.count(Option::is_some)
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.landing_row(col).is_none()
    }

    /// Lowest empty row of `col`, `None` when the column is full or does not exist.
    fn landing_row(&self, col: usize) -> Option<Coord> {
        let col = Coord::try_from(col).ok().filter(|&col| col < COLS)?;
        (0..ROWS).rev().find(|&row| self.cells[(row, col)].is_none())
    }

    /// Topmost occupied row of `col`.
    fn top_row(&self, col: usize) -> Option<Coord> {
        let col = Coord::try_from(col).ok().filter(|&col| col < COLS)?;
        (0..ROWS).find(|&row| self.cells[(row, col)].is_some())
    }

    /// Drops a piece into `col`; it lands in the lowest empty row. Returns where it landed, or
    /// `None` without touching the board when the column is full or out of range.
    pub fn drop(&mut self, col: usize, player: Player) -> Option<CellIndex> {
        let row = self.landing_row(col)?;
        let coords = (row, col as Coord);
        self.cells[coords] = Some(player);
        self.cells.index_of(coords)
    }

    /// The cells of the first complete window of four, scanning from the top-left.
    pub fn winning_window(&self) -> Option<(Player, [CellIndex; CONNECT])> {
        let size = self.size();
        let occupied = self.cells.indexed().filter(|(_, cell)| cell.is_some());
        for start in occupied.map(|(index, _)| index) {
            let Some(origin) = self.cells.coords_of(start) else {
                continue;
            };
            let Some(player) = self.cell(origin) else {
                continue;
            };

            'window: for delta in WINDOWS {
                let mut window = [start; CONNECT];
                let mut coords = origin;
                for slot in window.iter_mut().skip(1) {
                    let Some(next) = apply_delta(coords, delta, size) else {
                        continue 'window;
                    };
                    if self.cell(next) != Some(player) {
                        continue 'window;
                    }
                    coords = next;
                    *slot = usize::from(next.0) * usize::from(COLS) + usize::from(next.1);
                }
                return Some((player, window));
            }
        }
        None
    }
}

impl Adversarial for ConnectFourBoard {
    /// Column index.
    type Move = usize;

    fn legal_moves(&self) -> Vec<usize> {
        if self.status().is_terminal() {
            return Vec::new();
        }
        (0..usize::from(COLS))
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    fn play(&mut self, col: usize, player: Player) {
        self.drop(col, player);
    }

    fn unplay(&mut self, col: usize) {
        if let Some(row) = self.top_row(col) {
            self.cells[(row, col as Coord)] = None;
        }
    }

    fn status(&self) -> Status {
        if let Some((player, _)) = self.winning_window() {
            Status::Win(player)
        } else if (0..usize::from(COLS)).all(|col| self.is_column_full(col)) {
            Status::Draw
        } else {
            Status::Ongoing
        }
    }
}

impl VersusRules for ConnectFourBoard {
    const ID: &'static str = "connect-4";
    const STRATEGY: Strategy = Strategy::Tactical;

    /// Win-or-block at every difficulty.
    fn policy(_difficulty: Difficulty) -> SelectionPolicy {
        SelectionPolicy::Best
    }

    fn read_input(&self, input: Input) -> Option<usize> {
        match input {
            Input::Column(col) => Some(col),
            // any cell of a column drops into that column
            Input::Cell(index) => self.cells.coords_of(index).map(|(_, col)| usize::from(col)),
            _ => None,
        }
    }

    fn result(status: Status) -> GameResult {
        match status {
            Status::Win(Player::Human) => GameResult::won(500).with_message("You win!"),
            Status::Win(Player::Computer) => GameResult::lost(50).with_message("The computer wins"),
            _ => GameResult::won(250).with_message("It's a draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    fn board(drops: &[(usize, Player)]) -> ConnectFourBoard {
        let mut board = ConnectFourBoard::new();
        for &(col, player) in drops {
            assert!(board.drop(col, player).is_some());
        }
        board
    }

    #[test]
    fn pieces_land_in_the_lowest_empty_row() {
        let mut board = ConnectFourBoard::new();
        assert_eq!(board.drop(3, Player::Human), Some(5 * 7 + 3));
        assert_eq!(board.drop(3, Player::Computer), Some(4 * 7 + 3));
        assert_eq!(board.cell((5, 3)), Some(Player::Human));
        assert_eq!(board.cell((4, 3)), Some(Player::Computer));
        assert_eq!(board.cell((3, 3)), None);
    }

    #[test]
    fn full_column_is_rejected_unchanged() {
        let mut board = ConnectFourBoard::new();
        let mut player = Player::Human;
        for _ in 0..ROWS {
            board.drop(0, player);
            player = player.other();
        }
        let before = board.clone();

        assert!(board.is_column_full(0));
        assert_eq!(board.drop(0, Player::Human), None);
        assert_eq!(board.drop(7, Player::Human), None);
        assert_eq!(board, before);
        assert!(!board.legal_moves().contains(&0));
        assert_eq!(board.status(), Status::Ongoing);
    }

    #[test]
    fn fourth_piece_in_a_row_wins_immediately() {
        use Player::*;

        let mut board = board(&[
            (0, Human),
            (0, Computer),
            (1, Human),
            (1, Computer),
            (2, Human),
            (2, Computer),
        ]);
        assert_eq!(board.status(), Status::Ongoing);

        board.drop(3, Human);
        assert_eq!(board.status(), Status::Win(Human));
        assert_eq!(board.winning_window(), Some((Human, [35, 36, 37, 38])));
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn detects_vertical_and_diagonal_windows() {
        use Player::*;

        let vertical = board(&[(6, Computer), (6, Computer), (6, Computer), (6, Computer)]);
        assert_eq!(vertical.status(), Status::Win(Computer));

        // rising to the right from the bottom-left corner
        let rising = board(&[
            (0, Human),
            (1, Computer),
            (1, Human),
            (2, Computer),
            (2, Computer),
            (2, Human),
            (3, Computer),
            (3, Computer),
            (3, Computer),
            (3, Human),
        ]);
        assert_eq!(rising.status(), Status::Win(Human));

        // falling to the right
        let falling = board(&[
            (3, Computer),
            (2, Human),
            (2, Computer),
            (1, Human),
            (1, Human),
            (1, Computer),
            (0, Human),
            (0, Human),
            (0, Human),
            (0, Computer),
        ]);
        assert_eq!(falling.status(), Status::Win(Computer));
    }

    #[test]
    fn full_board_without_a_window_is_a_draw() {
        let mut board = ConnectFourBoard::new();
        for col in 0..usize::from(COLS) {
            for row in (0..usize::from(ROWS)).rev() {
                // colours alternate along rows and every two rows down a column, so no line
                // holds more than two of a kind
                let player = if (row / 2 + col) % 2 == 0 {
                    Player::Human
                } else {
                    Player::Computer
                };
                assert!(board.drop(col, player).is_some());
            }
        }

        assert_eq!(board.occupied(), 42);
        assert_eq!(board.winning_window(), None);
        assert_eq!(board.status(), Status::Draw);
        assert!(board.legal_moves().is_empty());
        assert_eq!(ConnectFourBoard::result(Status::Draw).score, 250);
    }

    #[test]
    fn unplay_restores_the_previous_board() {
        let mut board = board(&[(2, Player::Human), (2, Player::Computer)]);
        let before = board.clone();

        board.play(2, Player::Human);
        assert_eq!(board.occupied(), 3);
        board.unplay(2);
        assert_eq!(board, before);
    }

    #[test]
    fn tactics_block_the_open_three() {
        use Player::*;

        let board = board(&[(0, Human), (6, Computer), (1, Human), (5, Computer), (2, Human)]);
        // the computer has no win, so column 3 is the only block
        assert_eq!(tactical_moves(&board, Computer), [3]);

        let opponent = Opponent::new(Strategy::Tactical, Difficulty::Hard);
        let mut rng = GameRng::new(12);
        for _ in 0..10 {
            assert_eq!(opponent.choose(&board, &mut rng), Some(3));
        }
    }

    #[test]
    fn tactics_prefer_winning_over_blocking() {
        use Player::*;

        let board = board(&[
            (0, Human),
            (6, Computer),
            (1, Human),
            (6, Computer),
            (2, Human),
            (6, Computer),
        ]);
        assert_eq!(winning_moves(&board, Human), [3]);
        assert_eq!(tactical_moves(&board, Computer), [6]);
    }

    #[test]
    fn cell_input_drops_into_its_column() {
        let config = GameConfig::new(Difficulty::Easy).with_seed(1);
        let mut game = ConnectFour::new(config, Box::new(()));
        game.start();

        assert_eq!(game.handle_input(Input::Cell(2 * 7 + 4)), MoveOutcome::Applied);
        assert_eq!(game.board().cell((5, 4)), Some(Player::Human));
        assert_eq!(game.pending_tasks(), 1);

        game.advance(THINKING_DELAY);
        assert_eq!(game.board().occupied(), 2);
        assert_eq!(game.turn(), Player::Human);
        assert_eq!(game.handle_input(Input::Column(9)), MoveOutcome::Rejected);
    }

    #[test]
    fn cells_off_the_board_are_rejected() {
        let config = GameConfig::new(Difficulty::Easy).with_seed(1);
        let mut game = ConnectFour::new(config, Box::new(()));
        game.start();

        for index in [ROWS as usize * COLS as usize, 1000, usize::MAX] {
            assert_eq!(game.handle_input(Input::Cell(index)), MoveOutcome::Rejected);
        }
        assert_eq!(game.board().occupied(), 0);
        assert_eq!(game.pending_tasks(), 0);
        assert_eq!(game.handle_input(Input::Cell(41)), MoveOutcome::Applied);
        assert_eq!(game.board().cell((5, 6)), Some(Player::Human));
    }

    #[test]
    fn computer_blocks_at_every_difficulty() {
        let mut blocks = 0;
        for (seed, difficulty) in (0..30).zip(Difficulty::ALL.into_iter().cycle()) {
            let config = GameConfig::new(difficulty).with_seed(seed);
            let mut game = ConnectFour::new(config, Box::new(()));
            let mut rng = GameRng::new(seed + 100);
            game.start();
            assert_eq!(game.opponent().policy, SelectionPolicy::Best);

            while game.phase() == Phase::Playing {
                let &col = rng.pick(&game.board().legal_moves()).unwrap();
                if game.handle_input(Input::Column(col)) != MoveOutcome::Applied {
                    break;
                }

                let before = game.board().clone();
                let threats = winning_moves(&before, Player::Human);
                let own_wins = winning_moves(&before, Player::Computer);
                game.advance(THINKING_DELAY);

                if threats.is_empty() || !own_wins.is_empty() {
                    continue;
                }
                let played = (0..COLS)
                    .find(|&c| (0..ROWS).any(|r| before.cell((r, c)) != game.board().cell((r, c))))
                    .map(usize::from);
                assert!(
                    played.is_some_and(|col| threats.contains(&col)),
                    "{} seed {}",
                    difficulty,
                    seed
                );
                blocks += 1;
            }
        }
        assert!(blocks > 0);
    }

    #[test]
    fn every_game_reports_exactly_once() {
        for (seed, difficulty) in (0..12).zip(Difficulty::ALL.into_iter().cycle()) {
            let log = ReportLog::new();
            let config = GameConfig::new(difficulty).with_seed(seed);
            let mut game = ConnectFour::new(config, Box::new(log.clone()));
            let mut rng = GameRng::new(seed + 50);
            game.start();

            while game.phase() == Phase::Playing {
                let &col = rng.pick(&game.board().legal_moves()).unwrap();
                game.handle_input(Input::Column(col));
                game.advance(THINKING_DELAY);
            }

            let results = log.results();
            assert_eq!(results.len(), 1);
            assert!([500, 50, 250].contains(&results[0].score));
            assert_eq!(results[0].won, results[0].score != 50);
            assert_eq!(game.handle_input(Input::Column(0)), MoveOutcome::Rejected);
        }
    }
}
