// Error taxonomy for the search engine
//
// Cancellation is modelled as error values rather than a side channel:
// `Aborted` and `ThresholdReached` unwind the recursive search through `?`
// and are handled (or not) by the layer that owns the decision. Only the
// iterative-deepening orchestrator recovers from `ThresholdReached`; every
// other variant surfaces to the caller.

use thiserror::Error;

/// Errors produced by the search core.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A local precondition was violated (depth < 1, unknown player,
    /// unparsable move text, duplicate players, ...). Never recovered.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The state pool was asked for more objects than it is allowed to hold.
    #[error("state pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },

    /// The state pool failed internally (state construction failed, or the
    /// pool lock was poisoned by a panicking thread).
    #[error("state pool failure: {0}")]
    Pool(String),

    /// The search was cancelled via its abort flag. The in-flight recursion
    /// unwinds completely; `best_move` is whatever was recorded before the
    /// flag was seen and must not be trusted.
    #[error("search aborted")]
    Aborted,

    /// The evaluation budget ran out below the root ply. Soft signal: the
    /// iterative searcher catches this and keeps the last completed
    /// iteration's result.
    #[error("evaluation threshold reached after {evaluations} evaluations")]
    ThresholdReached { evaluations: u64 },

    /// The root position offers no playable line (no legal moves and byes
    /// cannot produce one).
    #[error("no legal move available")]
    NoMove,
}

impl SearchError {
    /// True for the soft budget signal that iterative deepening recovers.
    pub fn is_threshold(&self) -> bool {
        matches!(self, SearchError::ThresholdReached { .. })
    }
}
