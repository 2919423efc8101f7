// Searcher hierarchy - negamax with alpha-beta pruning, negascout, and an
// iterative-deepening wrapper
//
// A searcher is asked for the best move from a state at a fixed depth. The
// single-pass searchers recurse through the move tree, drawing child states
// from the context's pool, ordering candidates through a MoveRanker and
// pruning with alpha-beta windows. The iterative wrapper repeats single
// passes at growing depth under an evaluation budget.

mod iterative;
mod negamax;
mod negascout;
mod progress;

pub use iterative::IterativeSearcher;
pub use negamax::AlphaBetaSearcher;
pub use negascout::NegascoutSearcher;
pub use progress::{ListenerHandle, ListenerSet, SearchProgressListener};

use crate::error::SearchError;
use crate::game::GameState;
use crate::ordering::MoveRanker;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Minimum score. One above `i32::MIN` so negation stays in range.
pub const MIN_SCORE: i32 = i32::MIN + 1;

/// Maximum score.
pub const MAX_SCORE: i32 = i32::MAX;

/// Construction-time knobs for the single-pass searchers.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Prune siblings once alpha meets beta. Disabling turns the searcher
    /// into plain negamax; pruning never changes the result, only the node
    /// count. Ignored by negascout, which requires the cutoff.
    pub alpha_beta_cutoff: bool,

    /// When the side to move has no legal move, pass the turn and keep
    /// searching at the same remaining depth instead of scoring the node as
    /// a leaf.
    pub allow_byes: bool,

    /// The ranker's learning assumes a meaningful move order (for example a
    /// library keyed by move sequence), so only notify it of evaluations at
    /// the last ply, where ordering cannot be corrupted mid-search.
    pub order_of_moves_is_important: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            alpha_beta_cutoff: true,
            allow_byes: false,
            order_of_moves_is_important: false,
        }
    }
}

/// Common surface of the single-pass searchers, letting the
/// [`IterativeSearcher`] wrap either variant.
///
/// One `find_move` call owns one complete search: the per-call state
/// (best move, best score, evaluation count, abort flag) is reset on entry
/// and readable through the getters afterwards.
pub trait MoveSearcher {
    type Game: GameState;

    /// Search `depth` plies deep, bounded by `threshold` evaluations when
    /// given. The threshold is never enforced at the root ply, so a
    /// depth-1 search below a caller that passes `None` always completes.
    fn find_move_within(
        &mut self,
        state: &Self::Game,
        ranker: Option<&mut (dyn MoveRanker<Self::Game> + '_)>,
        depth: u32,
        threshold: Option<u64>,
    ) -> Result<<Self::Game as GameState>::Move, SearchError>;

    /// Search with no evaluation budget.
    fn find_move(
        &mut self,
        state: &Self::Game,
        ranker: Option<&mut (dyn MoveRanker<Self::Game> + '_)>,
        depth: u32,
    ) -> Result<<Self::Game as GameState>::Move, SearchError> {
        self.find_move_within(state, ranker, depth, None)
    }

    /// Best move recorded by the last `find_move` call, if any.
    fn best_move(&self) -> Option<&<Self::Game as GameState>::Move>;

    /// Score of [`best_move`](MoveSearcher::best_move), from the root
    /// player's perspective. A move answered from the opening library was
    /// never searched, so its score is a neutral 0.
    fn best_score(&self) -> i32;

    /// Leaf evaluations performed by the last call.
    fn evaluation_count(&self) -> u64;

    /// Whether the last call was cancelled through the abort flag.
    fn was_aborted(&self) -> bool;

    /// Cooperative-cancellation flag. Setting it (from any thread) makes the
    /// in-flight search unwind with [`SearchError::Aborted`]. Cleared when a
    /// new `find_move` call begins.
    fn abort_handle(&self) -> Arc<AtomicBool>;

    /// Fire the iteration event on this searcher's listeners.
    fn notify_iteration(&self, iteration: u32, depth: u32);

    /// Register a progress listener.
    fn add_listener(&mut self, listener: ListenerHandle<Self::Game>);

    /// Detach a progress listener; returns whether it was registered.
    fn remove_listener(&mut self, listener: &ListenerHandle<Self::Game>) -> bool;
}
