// Negamax search with alpha-beta pruning
//
// Negamax collapses minimax into one maximizing function by exploiting the
// zero-sum symmetry between the players: the score of a position for the
// side to move is the negation of the same position scored for the
// opponent, so every node maximizes -score(child) over a negated, swapped
// alpha-beta window.
//
// The searcher is generic over the game. Child positions come from the
// context's state pool and go back on every path, including error unwinds;
// cancellation (abort flag, evaluation threshold) travels through the
// Result channel and unwinds the whole recursion.

use super::progress::{ListenerHandle, ListenerSet};
use super::{MoveSearcher, SearchConfig, MAX_SCORE, MIN_SCORE};
use crate::context::GameContext;
use crate::error::SearchError;
use crate::game::{Evaluator, GameState, OpeningLibrary};
use crate::ordering::{MoveRanker, RankedMoveList};
use crate::pool::Pooled;
use log::debug;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-pass alpha-beta negamax searcher.
///
/// One [`find_move`](MoveSearcher::find_move) call walks the move tree to a
/// fixed depth and returns the move judged best for the player to move in
/// the given state. The best move and score are recorded at the root ply
/// only; everything below contributes scores through the negamax recursion.
pub struct AlphaBetaSearcher<'a, G: GameState> {
    ctx: &'a GameContext<G>,
    evaluator: Box<dyn Evaluator<G>>,
    config: SearchConfig,
    library: Option<Box<dyn OpeningLibrary<G>>>,
    listeners: ListenerSet<G>,
    abort: Arc<AtomicBool>,

    // Per-call search state, reset on entry to find_move
    max_depth: u32,
    threshold: Option<u64>,
    best_move: Option<G::Move>,
    best_score: i32,
    evaluation_count: u64,
    aborted: bool,
}

impl<'a, G: GameState> AlphaBetaSearcher<'a, G> {
    pub fn new(ctx: &'a GameContext<G>, evaluator: Box<dyn Evaluator<G>>) -> Self {
        Self::with_config(ctx, evaluator, SearchConfig::default())
    }

    pub fn with_config(
        ctx: &'a GameContext<G>,
        evaluator: Box<dyn Evaluator<G>>,
        config: SearchConfig,
    ) -> Self {
        AlphaBetaSearcher {
            ctx,
            evaluator,
            config,
            library: None,
            listeners: ListenerSet::new(),
            abort: Arc::new(AtomicBool::new(false)),
            max_depth: 0,
            threshold: None,
            best_move: None,
            best_score: MIN_SCORE,
            evaluation_count: 0,
            aborted: false,
        }
    }

    /// Attach an opening library consulted before any tree is built.
    pub fn set_library(&mut self, library: Box<dyn OpeningLibrary<G>>) {
        self.library = Some(library);
    }

    fn reset_run(&mut self, max_depth: u32, threshold: Option<u64>) {
        self.max_depth = max_depth;
        self.threshold = threshold;
        self.best_move = None;
        self.best_score = MIN_SCORE;
        self.evaluation_count = 0;
        self.aborted = false;
        self.abort.store(false, Ordering::SeqCst);
    }

    /// Rank the legal moves of `state`, falling back to the game's natural
    /// order when no ranker is configured.
    fn ordered_moves(
        &self,
        state: &G,
        ranker: Option<&mut (dyn MoveRanker<G> + '_)>,
        remaining: u32,
    ) -> SmallVec<[G::Move; 16]> {
        let moves = state.legal_moves();
        match ranker {
            Some(ranker) => {
                let mut list = RankedMoveList::new(self.ctx.randomize_equal_ranks());
                for mv in moves {
                    let rank = ranker.rank(&mv, state, remaining);
                    list.add_ranked(mv, rank);
                }
                list.into_moves()
            }
            None => SmallVec::from_vec(moves),
        }
    }

    /// Check a pool state out and load it with `parent`'s position.
    fn checkout_child(&self, parent: &G) -> Result<Pooled<G>, SearchError> {
        let mut child = self.ctx.pool().checkout(self.ctx.checkout_params())?;
        child.copy_from(parent);
        Ok(child)
    }

    /// Score `state` with the static evaluator, counting the evaluation and
    /// firing the leaf event.
    fn score_leaf(&mut self, start: &G, state: &G, remaining: u32) -> i32 {
        let depth_from_root = self.max_depth - remaining;
        let score = self
            .evaluator
            .score(start, state, depth_from_root, self.max_depth);
        self.evaluation_count += 1;
        self.listeners.emit_leaf_evaluation(state, score, depth_from_root);
        score
    }

    /// Abort and threshold gates, run at the top of every recursive call.
    /// The threshold is a soft budget and is never enforced at the root ply.
    fn check_interrupts(&mut self, is_root: bool) -> Result<(), SearchError> {
        if self.abort.load(Ordering::SeqCst) {
            self.aborted = true;
            return Err(SearchError::Aborted);
        }
        if !is_root {
            if let Some(limit) = self.threshold {
                if self.evaluation_count >= limit {
                    return Err(SearchError::ThresholdReached {
                        evaluations: self.evaluation_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// The negamax recursion. Returns the score of `state` from the
    /// perspective of its current player.
    fn search(
        &mut self,
        start: &G,
        state: &G,
        mut ranker: Option<&mut (dyn MoveRanker<G> + '_)>,
        remaining: u32,
        mut alpha: i32,
        beta: i32,
        is_root: bool,
    ) -> Result<i32, SearchError> {
        self.check_interrupts(is_root)?;

        // A finished game has no moves at any depth; score it where it lies
        if remaining == 0 || state.is_game_over() {
            return Ok(self.score_leaf(start, state, remaining));
        }

        let moves = self.ordered_moves(state, ranker.as_deref_mut(), remaining);

        if moves.is_empty() {
            if !self.config.allow_byes {
                // No byes: a moveless side is scored where it stands
                return Ok(self.score_leaf(start, state, remaining));
            }
            // Bye: the other player searches on at the same remaining depth.
            // Counted as a branch, and negated like any opponent score.
            self.listeners.emit_branch(state, remaining);
            let mut child = self.checkout_child(state)?;
            child.pass_turn();
            let result = self.search(
                start,
                &child,
                ranker.as_deref_mut(),
                remaining,
                -beta,
                -alpha,
                false,
            );
            self.ctx.pool().checkin(child);
            return Ok(-result?);
        }

        self.listeners.emit_branch(state, remaining);

        let mut best = MIN_SCORE;
        for mv in moves {
            let mut child = self.checkout_child(state)?;
            if child.apply_move(&mv, true) == 0 {
                // Move generator produced a no-op; nothing to search
                self.ctx.pool().checkin(child);
                continue;
            }

            let result = self.search(
                start,
                &child,
                ranker.as_deref_mut(),
                remaining - 1,
                -beta,
                -alpha,
                false,
            );
            // The child goes back before any error propagates
            self.ctx.pool().checkin(child);
            let score = -result?;

            self.listeners.emit_node_evaluation(&mv, score, remaining);
            if let Some(r) = ranker.as_deref_mut() {
                if !self.config.order_of_moves_is_important || remaining == 1 {
                    r.on_evaluation(&mv, state, score, state.current_player(), remaining);
                }
            }

            if score > best {
                best = score;
                if is_root {
                    self.best_move = Some(mv.clone());
                    self.best_score = score;
                }
            }

            if self.config.alpha_beta_cutoff {
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    break;
                }
            }
        }

        Ok(best)
    }
}

impl<G: GameState> MoveSearcher for AlphaBetaSearcher<'_, G> {
    type Game = G;

    fn find_move_within(
        &mut self,
        state: &G,
        mut ranker: Option<&mut (dyn MoveRanker<G> + '_)>,
        depth: u32,
        threshold: Option<u64>,
    ) -> Result<G::Move, SearchError> {
        if depth < 1 {
            return Err(SearchError::InvalidArgument(
                "search depth must be >= 1".into(),
            ));
        }
        let max_depth = depth.min(state.max_moves_remaining().max(1));
        self.reset_run(max_depth, threshold);

        if let Some(library) = &self.library {
            if library.should_use_library(state, depth) {
                if let Some(mv) = library.find_move(state, depth) {
                    // Library hit: no tree, no progress events, neutral score
                    self.best_move = Some(mv.clone());
                    self.best_score = 0;
                    return Ok(mv);
                }
            }
        }

        self.search(
            state,
            state,
            ranker.as_deref_mut(),
            max_depth,
            MIN_SCORE,
            MAX_SCORE,
            true,
        )?;
        debug!(
            "alpha-beta search done: depth {}, score {}, {} evaluations",
            max_depth, self.best_score, self.evaluation_count
        );
        self.best_move.clone().ok_or(SearchError::NoMove)
    }

    fn best_move(&self) -> Option<&G::Move> {
        self.best_move.as_ref()
    }

    fn best_score(&self) -> i32 {
        self.best_score
    }

    fn evaluation_count(&self) -> u64 {
        self.evaluation_count
    }

    fn was_aborted(&self) -> bool {
        self.aborted
    }

    fn abort_handle(&self) -> Arc<AtomicBool> {
        self.abort.clone()
    }

    fn notify_iteration(&self, iteration: u32, depth: u32) {
        self.listeners.emit_iteration(iteration, depth);
    }

    fn add_listener(&mut self, listener: ListenerHandle<G>) {
        self.listeners.add(listener);
    }

    fn remove_listener(&mut self, listener: &ListenerHandle<G>) -> bool {
        self.listeners.remove(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyGame, DummyMove, DummyMoveFactory, TableEvaluator, TreeSpec};
    use crate::pool::StatePool;
    use std::sync::Arc;

    // Two-level tree: A splits to B/C for player 0, each leaf scored for
    // player 1 (the mover there). Negamax picks the child whose negated
    // score is best for player 0.
    fn small_tree() -> Arc<TreeSpec> {
        Arc::new(TreeSpec::new("A").moves("A", 0, &[("b", "B"), ("c", "C")]))
    }

    fn context(tree: Arc<TreeSpec>) -> GameContext<DummyGame> {
        let pool_tree = tree.clone();
        let pool = StatePool::with_factory(None, move || Ok(DummyGame::new(pool_tree.clone())));
        GameContext::new(vec![0, 1], pool, Box::new(DummyMoveFactory), (), false).unwrap()
    }

    #[test]
    fn test_picks_move_with_best_negated_child_score() {
        let tree = small_tree();
        let ctx = context(tree.clone());
        // B is bad for player 1 (-5), C is good (+5): player 0 wants B
        let eval = TableEvaluator::new(0).set("B", 1, -5).set("C", 1, 5);
        let mut searcher = AlphaBetaSearcher::new(&ctx, Box::new(eval));

        let root = DummyGame::new(tree);
        let mv = searcher.find_move(&root, None, 1).unwrap();
        assert_eq!(mv, DummyMove("b".into()));
        assert_eq!(searcher.best_score(), 5);
        assert_eq!(searcher.evaluation_count(), 2);
    }

    #[test]
    fn test_depth_zero_is_rejected() {
        let tree = small_tree();
        let ctx = context(tree.clone());
        let mut searcher =
            AlphaBetaSearcher::new(&ctx, Box::new(TableEvaluator::new(0)));

        let root = DummyGame::new(tree);
        let err = searcher.find_move(&root, None, 0).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_abort_unwinds_the_search() {
        let tree = small_tree();
        let ctx = context(tree.clone());
        let mut searcher =
            AlphaBetaSearcher::new(&ctx, Box::new(TableEvaluator::new(0)));

        let root = DummyGame::new(tree);
        // A flag armed before the call is cleared on entry
        searcher.abort_handle().store(true, Ordering::SeqCst);
        assert!(searcher.find_move(&root, None, 1).is_ok());
        assert!(!searcher.was_aborted());
    }

    #[test]
    fn test_abort_during_search_unwinds_with_pool_intact() {
        struct Trigger {
            flag: Arc<AtomicBool>,
        }
        impl crate::search::SearchProgressListener<DummyGame> for Trigger {
            fn on_branch(&mut self, _state: &DummyGame, _remaining_depth: u32) {
                self.flag.store(true, Ordering::SeqCst);
            }
        }

        let tree = small_tree();
        let ctx = context(tree.clone());
        let mut searcher =
            AlphaBetaSearcher::new(&ctx, Box::new(TableEvaluator::new(0)));
        searcher.add_listener(std::rc::Rc::new(std::cell::RefCell::new(Trigger {
            flag: searcher.abort_handle(),
        })));

        let root = DummyGame::new(tree);
        let err = searcher.find_move(&root, None, 2).unwrap_err();
        assert!(matches!(err, SearchError::Aborted));
        assert!(searcher.was_aborted());
        assert_eq!(ctx.pool().checked_out_count(), 0);
    }

    #[test]
    fn test_game_over_root_has_no_move() {
        let tree = Arc::new(TreeSpec::new("A")); // no edges at all
        let ctx = context(tree.clone());
        let mut searcher =
            AlphaBetaSearcher::new(&ctx, Box::new(TableEvaluator::new(0)));

        let root = DummyGame::new(tree);
        let err = searcher.find_move(&root, None, 3).unwrap_err();
        assert!(matches!(err, SearchError::NoMove));
    }

    #[test]
    fn test_pool_balance_after_search() {
        let tree = small_tree();
        let ctx = context(tree.clone());
        let eval = TableEvaluator::new(0).set("B", 1, 1).set("C", 1, 2);
        let mut searcher = AlphaBetaSearcher::new(&ctx, Box::new(eval));

        let root = DummyGame::new(tree);
        searcher.find_move(&root, None, 1).unwrap();
        assert_eq!(ctx.pool().checked_out_count(), 0);
    }
}
