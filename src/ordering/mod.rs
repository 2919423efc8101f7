// Move ordering for the searchers
//
// Ordering is an algorithmic contract, not cosmetics: children are visited
// highest rank first, and that order decides which branches alpha-beta can
// cut. The pieces here are the ranked insertion list consumed by the search
// loop, the pluggable ranking strategy, and the killer-move decorator that
// learns from evaluations as the search runs.

mod killer;
mod ranked_list;

pub use killer::{KillerHeuristicMoveRanker, KILLER_BASE};
pub use ranked_list::RankedMoveList;

use crate::game::GameState;

/// Pluggable move-ordering strategy.
///
/// `rank` orders candidate moves (higher = tried earlier); `on_evaluation`
/// lets adaptive rankers learn from scores observed during the search;
/// `reset` clears any learned state before a fresh search. The iterative
/// searcher deliberately does **not** reset between deepening passes so the
/// learning carries over.
pub trait MoveRanker<G: GameState> {
    /// Rank `mv` in `state` at `depth` remaining plies. Higher ranks are
    /// searched first.
    fn rank(&self, mv: &G::Move, state: &G, depth: u32) -> i32;

    /// Observe the score a move earned at `depth` for `player`.
    fn on_evaluation(
        &mut self,
        _mv: &G::Move,
        _state: &G,
        _score: i32,
        _player: G::Player,
        _depth: u32,
    ) {
    }

    /// Drop all learned state.
    fn reset(&mut self) {}
}

/// Ranker that treats every move equally. Useful as a killer-heuristic
/// delegate when no game knowledge is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRanker;

impl<G: GameState> MoveRanker<G> for UniformRanker {
    fn rank(&self, _mv: &G::Move, _state: &G, _depth: u32) -> i32 {
        0
    }
}
