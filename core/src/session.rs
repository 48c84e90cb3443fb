use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

/// Receives the signals a running game sends to the host shell.
pub trait Reporter {
    /// Called exactly once per session, when the game reaches a terminal state.
    fn game_over(&mut self, result: &GameResult);

    fn score_changed(&mut self, _score: u32) {}
}

impl Reporter for () {
    fn game_over(&mut self, _result: &GameResult) {}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Report {
    Score(u32),
    GameOver(GameResult),
}

/// Shared, cloneable log of every signal, for hosts that poll instead of reacting.
#[derive(Clone, Debug, Default)]
pub struct ReportLog(Rc<RefCell<Vec<Report>>>);

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.0.borrow().clone()
    }

    pub fn results(&self) -> Vec<GameResult> {
        self.0
            .borrow()
            .iter()
            .filter_map(|report| match report {
                Report::GameOver(result) => Some(result.clone()),
                Report::Score(_) => None,
            })
            .collect()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|report| match report {
                Report::Score(score) => Some(*score),
                Report::GameOver(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Reporter for ReportLog {
    fn game_over(&mut self, result: &GameResult) {
        self.0.borrow_mut().push(Report::GameOver(result.clone()));
    }

    fn score_changed(&mut self, score: u32) {
        self.0.borrow_mut().push(Report::Score(score));
    }
}

/// Valid transitions:
/// - Idle -> Playing
/// - Playing -> Stopped | Over
/// - Stopped -> Playing
/// - Over -> Playing
/// - any -> Destroyed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Stopped,
    Over,
    Destroyed,
}

/// Lifecycle bookkeeping shared by every game: configuration, signals, score, and the timers
/// belonging to the current session.
pub struct Session<T> {
    id: &'static str,
    config: GameConfig,
    reporter: Box<dyn Reporter>,
    timers: Timers<T>,
    score: u32,
    phase: Phase,
    reported: bool,
}

impl<T> Session<T> {
    pub fn new(id: &'static str, config: GameConfig, reporter: Box<dyn Reporter>) -> Self {
        Self {
            id,
            config,
            reporter,
            timers: Timers::new(),
            score: 0,
            phase: Phase::Idle,
            reported: false,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn timers(&self) -> &Timers<T> {
        &self.timers
    }

    /// Starts a fresh session, dropping anything scheduled by the previous one. Returns `false`
    /// and changes nothing once the session is destroyed.
    pub fn begin(&mut self) -> bool {
        if self.phase == Phase::Destroyed {
            log::warn!("{}: start after destroy ignored", self.id);
            return false;
        }
        self.timers.cancel_all();
        self.phase = Phase::Playing;
        self.reported = false;
        self.score = 0;
        self.reporter.score_changed(0);
        log::debug!("{}: started ({})", self.id, self.config.difficulty);
        true
    }

    pub fn halt(&mut self) {
        self.timers.cancel_all();
        if matches!(self.phase, Phase::Playing) {
            self.phase = Phase::Stopped;
        }
        log::debug!("{}: stopped", self.id);
    }

    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.phase = Phase::Destroyed;
        log::debug!("{}: destroyed", self.id);
    }

    pub fn set_score(&mut self, score: u32) {
        if score != self.score {
            self.score = score;
            self.reporter.score_changed(score);
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.set_score(self.score.saturating_add(points));
    }

    /// Ends play and sends the outcome. Only the first call in a session reaches the reporter.
    pub fn finish(&mut self, result: GameResult) {
        self.timers.cancel_all();
        if self.reported {
            log::warn!("{}: outcome already reported, ignoring {:?}", self.id, result);
            return;
        }
        self.reported = true;
        self.phase = Phase::Over;
        log::debug!("{}: game over {:?}", self.id, result);
        self.reporter.game_over(&result);
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        self.timers.schedule(delay, task)
    }

    /// Due tasks for this session; nothing fires unless the session is playing.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        let due = self.timers.advance(elapsed);
        if self.is_playing() { due } else { Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(log: &ReportLog) -> Session<u8> {
        Session::new("test", GameConfig::default(), Box::new(log.clone()))
    }

    #[test]
    fn outcome_is_reported_once() {
        let log = ReportLog::new();
        let mut session = session(&log);

        session.begin();
        session.finish(GameResult::won(10));
        session.finish(GameResult::lost(0));

        assert_eq!(log.results(), [GameResult::won(10)]);
        assert_eq!(session.phase(), Phase::Over);
    }

    #[test]
    fn restart_allows_a_new_outcome() {
        let log = ReportLog::new();
        let mut session = session(&log);

        session.begin();
        session.finish(GameResult::lost(0));
        session.begin();
        session.finish(GameResult::won(5));

        assert_eq!(log.results().len(), 2);
    }

    #[test]
    fn score_changes_are_streamed() {
        let log = ReportLog::new();
        let mut session = session(&log);

        session.begin();
        session.add_score(4);
        session.add_score(0);
        session.set_score(12);

        assert_eq!(log.scores(), [0, 4, 12]);
        assert_eq!(session.score(), 12);
    }

    #[test]
    fn halt_cancels_pending_tasks() {
        let log = ReportLog::new();
        let mut session = session(&log);

        session.begin();
        session.schedule(Duration::from_millis(500), 1);
        session.halt();
        assert_eq!(session.timers().pending(), 0);

        session.begin();
        assert!(session.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn destroyed_session_stays_destroyed() {
        let log = ReportLog::new();
        let mut session = session(&log);

        assert!(session.begin());
        session.add_score(7);
        session.teardown();

        assert!(!session.begin());
        assert_eq!(session.phase(), Phase::Destroyed);
        assert_eq!(session.score(), 7);
        assert_eq!(log.scores(), [0, 7]);
    }
}
