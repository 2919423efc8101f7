//! Generic adversarial search for two-player, perfect-information games.
//!
//! The crate is organised around a handful of traits the host game
//! implements ([`GameState`], [`Evaluator`], and optionally [`MoveRanker`],
//! [`MoveFactory`] and [`OpeningLibrary`]) and the searchers that drive
//! them: [`AlphaBetaSearcher`] (negamax with alpha-beta pruning),
//! [`NegascoutSearcher`] (principal variation search) and the
//! [`IterativeSearcher`] deepening wrapper.
//!
//! Child positions during search are not allocated per node: a
//! [`StatePool`] recycles state objects, and a [`GameContext`] ties the
//! pool, the players and the move factory together for the searchers.
//!
//! ```no_run
//! use gametree::dummy::{DummyGame, DummyMoveFactory, TableEvaluator, TreeSpec};
//! use gametree::{AlphaBetaSearcher, GameContext, MoveSearcher, StatePool};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), gametree::SearchError> {
//! let tree = Arc::new(TreeSpec::new("A").moves("A", 0, &[("b", "B"), ("c", "C")]));
//! let pool_tree = tree.clone();
//! let pool = StatePool::with_factory(None, move || Ok(DummyGame::new(pool_tree.clone())));
//! let ctx = GameContext::new(vec![0, 1], pool, Box::new(DummyMoveFactory), (), false)?;
//!
//! let eval = TableEvaluator::new(0).set("B", 1, -5).set("C", 1, 5);
//! let mut searcher = AlphaBetaSearcher::new(&ctx, Box::new(eval));
//! let best = searcher.find_move(&DummyGame::new(tree), None, 1)?;
//! # let _ = best;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dummy;
pub mod error;
pub mod game;
pub mod ordering;
pub mod pool;
pub mod search;

pub use context::GameContext;
pub use error::SearchError;
pub use game::{Evaluator, GameState, MoveFactory, OpeningLibrary};
pub use ordering::{KillerHeuristicMoveRanker, MoveRanker, RankedMoveList, UniformRanker};
pub use pool::{Pooled, StatePool};
pub use search::{
    AlphaBetaSearcher, IterativeSearcher, ListenerHandle, MoveSearcher, NegascoutSearcher,
    SearchConfig, SearchProgressListener,
};
