// Iterative deepening orchestrator
//
// Progressively re-searches at depths 1, 2, ... up to the requested depth,
// keeping the best move from the last fully completed pass. The payoff is
// an anytime search: a tight evaluation budget still yields a move, and
// every completed pass improves the ranker's learned ordering for the next.

use super::MoveSearcher;
use crate::error::SearchError;
use crate::game::GameState;
use crate::ordering::MoveRanker;
use log::debug;

/// Iterative-deepening wrapper around a single-pass searcher.
///
/// Guarantees:
/// - the first iteration runs without the evaluation threshold, so a best
///   move exists even under the tightest budget;
/// - a [`SearchError::ThresholdReached`] from a later iteration stops the
///   loop and the move from the last completed iteration is returned —
///   partial work is never wasted;
/// - [`SearchError::Aborted`] propagates immediately, unrecovered.
///
/// The ranker is *not* reset between iterations: killer lists and other
/// learned ordering accumulated at shallow depths pay off at deeper ones.
pub struct IterativeSearcher<S> {
    inner: S,
    iteration: u32,
    depth_reached: u32,
    best_score: i32,
}

impl<S: MoveSearcher> IterativeSearcher<S> {
    pub fn new(inner: S) -> Self {
        IterativeSearcher {
            inner,
            iteration: 0,
            depth_reached: 0,
            best_score: 0,
        }
    }

    /// The wrapped single-pass searcher.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Deepest fully completed iteration of the last `find_move` call.
    pub fn depth_reached(&self) -> u32 {
        self.depth_reached
    }

    /// Number of iterations started by the last `find_move` call.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Score of the returned move, from the last completed iteration.
    pub fn best_score(&self) -> i32 {
        self.best_score
    }

    /// Search depths `1..=depth`, spending at most `threshold` evaluations
    /// per pass after the first.
    pub fn find_move(
        &mut self,
        state: &S::Game,
        mut ranker: Option<&mut (dyn MoveRanker<S::Game> + '_)>,
        depth: u32,
        threshold: u64,
    ) -> Result<<S::Game as GameState>::Move, SearchError> {
        if depth < 1 {
            return Err(SearchError::InvalidArgument(
                "search depth must be >= 1".into(),
            ));
        }

        self.iteration = 0;
        self.depth_reached = 0;
        self.best_score = 0;
        let mut best: Option<<S::Game as GameState>::Move> = None;

        for current_depth in 1..=depth {
            self.iteration = current_depth;
            self.inner.notify_iteration(current_depth, depth);

            // The first pass must complete: no threshold
            let pass_threshold = if current_depth == 1 {
                None
            } else {
                Some(threshold)
            };

            match self
                .inner
                .find_move_within(state, ranker.as_deref_mut(), current_depth, pass_threshold)
            {
                Ok(mv) => {
                    best = Some(mv);
                    self.best_score = self.inner.best_score();
                    self.depth_reached = current_depth;
                    debug!(
                        "iteration {current_depth}: score {}, {} evaluations",
                        self.inner.best_score(),
                        self.inner.evaluation_count()
                    );
                }
                Err(err) if err.is_threshold() => {
                    debug!(
                        "iteration {current_depth} hit the evaluation budget, keeping depth {}",
                        self.depth_reached
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        best.ok_or(SearchError::NoMove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GameContext;
    use crate::dummy::{DummyGame, DummyMove, DummyMoveFactory, TableEvaluator, TreeSpec};
    use crate::pool::StatePool;
    use crate::search::AlphaBetaSearcher;
    use std::sync::Arc;

    fn two_level_tree() -> Arc<TreeSpec> {
        Arc::new(
            TreeSpec::new("A")
                .moves("A", 0, &[("b", "B"), ("c", "C")])
                .moves("B", 1, &[("d", "D"), ("e", "E")])
                .moves("C", 1, &[("f", "F")]),
        )
    }

    fn context(tree: Arc<TreeSpec>) -> GameContext<DummyGame> {
        let pool_tree = tree.clone();
        let pool = StatePool::with_factory(None, move || Ok(DummyGame::new(pool_tree.clone())));
        GameContext::new(vec![0, 1], pool, Box::new(DummyMoveFactory), (), false).unwrap()
    }

    #[test]
    fn test_completes_all_iterations_without_budget_pressure() {
        let tree = two_level_tree();
        let ctx = context(tree.clone());
        let eval = TableEvaluator::new(0)
            .set("B", 1, -1)
            .set("C", 1, 3)
            .set("D", 0, 2)
            .set("E", 0, 6)
            .set("F", 0, -2);
        let mut searcher =
            IterativeSearcher::new(AlphaBetaSearcher::new(&ctx, Box::new(eval)));

        let root = DummyGame::new(tree);
        let mv = searcher.find_move(&root, None, 2, 1_000_000).unwrap();
        assert_eq!(searcher.depth_reached(), 2);
        assert_eq!(searcher.iteration(), 2);
        // Depth 2: value(B) for player 1 is max(-2, -6) = -2, so b scores
        // 2 for player 0; value(C) is -(-2) = 2, so c scores -2. Pick b.
        assert_eq!(mv, DummyMove("b".into()));
        assert_eq!(searcher.best_score(), 2);
    }

    #[test]
    fn test_tight_budget_keeps_first_iteration_result() {
        let tree = two_level_tree();
        let ctx = context(tree.clone());
        let eval = TableEvaluator::new(0)
            .set("B", 1, -5)
            .set("C", 1, 5)
            .set("D", 0, 1)
            .set("E", 0, 1)
            .set("F", 0, 1);
        let mut searcher =
            IterativeSearcher::new(AlphaBetaSearcher::new(&ctx, Box::new(eval)));

        let root = DummyGame::new(tree);
        // Depth 1 completes untouched by the budget; depth 2 trips after
        // the first evaluation and is discarded.
        let mv = searcher.find_move(&root, None, 5, 1).unwrap();
        assert_eq!(mv, DummyMove("b".into()));
        assert_eq!(searcher.depth_reached(), 1);
        assert_eq!(searcher.best_score(), 5);
        assert_eq!(ctx.pool().checked_out_count(), 0);
    }

    #[test]
    fn test_depth_zero_is_rejected() {
        let tree = two_level_tree();
        let ctx = context(tree.clone());
        let mut searcher = IterativeSearcher::new(AlphaBetaSearcher::new(
            &ctx,
            Box::new(TableEvaluator::new(0)),
        ));

        let root = DummyGame::new(tree);
        assert!(matches!(
            searcher.find_move(&root, None, 0, 100),
            Err(SearchError::InvalidArgument(_))
        ));
    }
}
