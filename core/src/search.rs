use alloc::vec::Vec;
use core::fmt::Debug;
use serde::{Deserialize, Serialize};

use crate::*;

/// A two-player, perfect-information board that can be searched by trying moves in place.
pub trait Adversarial: Clone {
    type Move: Copy + PartialEq + Debug;

    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a legal move for `player`.
    fn play(&mut self, mv: Self::Move, player: Player);

    /// Reverts the most recent `play` of `mv`.
    fn unplay(&mut self, mv: Self::Move);

    fn status(&self) -> Status;
}

/// Score of a win found at depth zero.
pub const WIN_SCORE: i32 = 10;

/// Chance that a medium opponent searches instead of picking at random.
pub const MEDIUM_OPTIMAL_CHANCE: f64 = 0.5;

/// Exhaustive minimax value of `board` for `maximizer`, with `to_move` playing next.
///
/// Wins score `WIN_SCORE - depth` and losses `depth - WIN_SCORE`, so faster wins and slower
/// losses are preferred. Draws score zero. No pruning and no depth limit: only for tiny trees.
pub fn minimax<G: Adversarial>(
    board: &mut G,
    to_move: Player,
    maximizer: Player,
    depth: i32,
) -> i32 {
    match board.status() {
        Status::Win(winner) if winner == maximizer => return WIN_SCORE - depth,
        Status::Win(_) => return depth - WIN_SCORE,
        Status::Draw | Status::Loss => return 0,
        Status::Ongoing => {}
    }

    let maximizing = to_move == maximizer;
    let mut best: Option<i32> = None;
    for mv in board.legal_moves() {
        board.play(mv, to_move);
        let score = minimax(board, to_move.other(), maximizer, depth + 1);
        board.unplay(mv);

        best = Some(match best {
            None => score,
            Some(best) if maximizing => best.max(score),
            Some(best) => best.min(score),
        });
    }
    best.unwrap_or(0)
}

/// All moves reaching the best minimax value for `player`, together with that value.
pub fn optimal_moves<G: Adversarial>(board: &G, player: Player) -> (Vec<G::Move>, i32) {
    let mut scratch = board.clone();
    let mut best_score = i32::MIN;
    let mut best_moves = Vec::new();

    for mv in board.legal_moves() {
        scratch.play(mv, player);
        let score = minimax(&mut scratch, player.other(), player, 0);
        scratch.unplay(mv);
        log::trace!("minimax {:?} -> {}", mv, score);

        if score > best_score {
            best_score = score;
            best_moves.clear();
        }
        if score == best_score {
            best_moves.push(mv);
        }
    }

    (best_moves, best_score)
}

/// Moves that immediately win the game for `player`.
pub fn winning_moves<G: Adversarial>(board: &G, player: Player) -> Vec<G::Move> {
    let mut scratch = board.clone();
    board
        .legal_moves()
        .into_iter()
        .filter(|&mv| {
            scratch.play(mv, player);
            let wins = scratch.status() == Status::Win(player);
            scratch.unplay(mv);
            wins
        })
        .collect()
}

/// One-ply tactics: take a win if there is one, else block the opponent's wins, else anything.
pub fn tactical_moves<G: Adversarial>(board: &G, player: Player) -> Vec<G::Move> {
    let wins = winning_moves(board, player);
    if !wins.is_empty() {
        return wins;
    }

    let blocks = winning_moves(board, player.other());
    if !blocks.is_empty() {
        log::trace!("blocking {:?}", blocks);
        return blocks;
    }

    board.legal_moves()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Full game-tree search.
    Minimax,
    /// Win-or-block lookahead of a single move.
    Tactical,
}

impl Strategy {
    pub fn candidates<G: Adversarial>(self, board: &G, player: Player) -> Vec<G::Move> {
        match self {
            Self::Minimax => optimal_moves(board, player).0,
            Self::Tactical => tactical_moves(board, player),
        }
    }
}

/// How often the opponent consults its strategy instead of playing a random legal move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    Random,
    Mixed,
    Best,
}

impl From<Difficulty> for SelectionPolicy {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Random,
            Difficulty::Medium => Self::Mixed,
            Difficulty::Hard => Self::Best,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub player: Player,
    pub strategy: Strategy,
    pub policy: SelectionPolicy,
}

impl Opponent {
    pub fn new(strategy: Strategy, difficulty: Difficulty) -> Self {
        Self::with_policy(strategy, difficulty.into())
    }

    pub fn with_policy(strategy: Strategy, policy: SelectionPolicy) -> Self {
        Self {
            player: Player::Computer,
            strategy,
            policy,
        }
    }

    /// Picks a move, breaking ties at random. `None` only when no legal move exists.
    pub fn choose<G: Adversarial>(&self, board: &G, rng: &mut GameRng) -> Option<G::Move> {
        let search = match self.policy {
            SelectionPolicy::Random => false,
            SelectionPolicy::Mixed => rng.chance(MEDIUM_OPTIMAL_CHANCE),
            SelectionPolicy::Best => true,
        };

        let candidates = if search {
            self.strategy.candidates(board, self.player)
        } else {
            board.legal_moves()
        };
        rng.pick(&candidates).copied()
    }
}
