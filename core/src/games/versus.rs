use alloc::boxed::Box;
use web_time::Duration;

use crate::*;

/// Cosmetic pause before the computer's reply is applied; the move itself is searched instantly.
pub const THINKING_DELAY: Duration = Duration::from_millis(500);

/// Rules of a human-versus-computer board game. The human always moves first.
pub trait VersusRules: Adversarial + Default {
    const ID: &'static str;

    /// Search the computer consults when its difficulty policy asks for it.
    const STRATEGY: Strategy;

    /// How often the computer searches at the given difficulty.
    fn policy(difficulty: Difficulty) -> SelectionPolicy {
        difficulty.into()
    }

    /// Translates a host input into a move on this board, without checking legality.
    fn read_input(&self, input: Input) -> Option<Self::Move>;

    /// Outcome sent to the host, from the human's point of view.
    fn result(status: Status) -> GameResult;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VersusTask {
    OpponentMove,
}

/// Turn-based duel between the human and a computer opponent.
pub struct Versus<B: VersusRules> {
    session: Session<VersusTask>,
    board: B,
    turn: Player,
    opponent: Opponent,
    rng: GameRng,
}

pub type TicTacToe = Versus<TicTacToeBoard>;
pub type ConnectFour = Versus<ConnectFourBoard>;

impl<B: VersusRules> Versus<B> {
    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            opponent: Opponent::with_policy(B::STRATEGY, B::policy(config.difficulty)),
            rng: config.rng(),
            session: Session::new(B::ID, config, reporter),
            board: B::default(),
            turn: Player::Human,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    /// Number of scheduled tasks still waiting, i.e. whether the computer is "thinking".
    pub fn pending_tasks(&self) -> usize {
        self.session.timers().pending()
    }

    /// Human move. Rejected when it is not the human's turn or the move is illegal.
    pub fn play_human(&mut self, mv: B::Move) -> MoveOutcome {
        if !self.session.is_playing() || self.turn != Player::Human {
            return MoveOutcome::Rejected;
        }
        self.apply(mv, Player::Human)
    }

    fn play_opponent(&mut self) {
        if !self.session.is_playing() || self.turn != Player::Computer {
            return;
        }
        if let Some(mv) = self.opponent.choose(&self.board, &mut self.rng) {
            log::debug!("{}: computer plays {:?}", B::ID, mv);
            self.apply(mv, Player::Computer);
        }
    }

    fn apply(&mut self, mv: B::Move, player: Player) -> MoveOutcome {
        if !self.board.legal_moves().contains(&mv) {
            log::trace!("{}: illegal move {:?} by {:?}", B::ID, mv, player);
            return MoveOutcome::Rejected;
        }
        self.board.play(mv, player);

        let status = self.board.status();
        if status.is_terminal() {
            let result = B::result(status);
            self.session.set_score(result.score);
            self.session.finish(result);
            return MoveOutcome::Finished;
        }

        self.turn = player.other();
        if self.turn == Player::Computer {
            self.session.schedule(THINKING_DELAY, VersusTask::OpponentMove);
        }
        MoveOutcome::Applied
    }
}

impl<B: VersusRules> Game for Versus<B> {
    fn id(&self) -> &'static str {
        B::ID
    }

    fn start(&mut self) {
        if !self.session.begin() {
            return;
        }
        self.board = B::default();
        self.turn = Player::Human;
    }

    fn stop(&mut self) {
        self.session.halt();
    }

    fn destroy(&mut self) {
        self.session.teardown();
    }

    fn handle_input(&mut self, input: Input) -> MoveOutcome {
        match self.board.read_input(input) {
            Some(mv) => self.play_human(mv),
            None => MoveOutcome::Rejected,
        }
    }

    fn advance(&mut self, elapsed: Duration) {
        for task in self.session.advance(elapsed) {
            match task {
                VersusTask::OpponentMove => self.play_opponent(),
            }
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
