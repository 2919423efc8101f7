// Negascout (principal variation search)
//
// Same shell as the alpha-beta negamax searcher, with the child-search step
// replaced: the first child is searched with the full window, every other
// child gets a null-window probe at (-(alpha+1), -alpha) first and is only
// re-searched with the full window when the probe lands strictly inside
// (alpha, beta). With good move ordering most probes fail immediately and
// the tree shrinks; with bad ordering the re-searches give the extra work
// back. The cutoff is not optional here: the re-search guard assumes the
// window is being tightened, so there is no plain-negamax mode.

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

/// Single-pass negascout searcher.
///
/// Behaves exactly like [`AlphaBetaSearcher`] from the outside — same
/// contract, same result on the same tree — but visits fewer nodes when the
/// configured move ranker orders well.
///
/// [`AlphaBetaSearcher`]: super::AlphaBetaSearcher
pub struct NegascoutSearcher<'a, G: GameState> {
    ctx: &'a GameContext<G>,
    evaluator: Box<dyn Evaluator<G>>,
    config: SearchConfig,
    library: Option<Box<dyn OpeningLibrary<G>>>,
    listeners: ListenerSet<G>,
    abort: Arc<AtomicBool>,

    max_depth: u32,
    threshold: Option<u64>,
    best_move: Option<G::Move>,
    best_score: i32,
    evaluation_count: u64,
    aborted: bool,
}

impl<'a, G: GameState> NegascoutSearcher<'a, G> {
    pub fn new(ctx: &'a GameContext<G>, evaluator: Box<dyn Evaluator<G>>) -> Self {
        Self::with_config(ctx, evaluator, SearchConfig::default())
    }

    /// `config.alpha_beta_cutoff` is ignored: negascout always prunes.
    pub fn with_config(
        ctx: &'a GameContext<G>,
        evaluator: Box<dyn Evaluator<G>>,
        config: SearchConfig,
    ) -> Self {
        NegascoutSearcher {
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

    fn checkout_child(&self, parent: &G) -> Result<Pooled<G>, SearchError> {
        let mut child = self.ctx.pool().checkout(self.ctx.checkout_params())?;
        child.copy_from(parent);
        Ok(child)
    }

    fn score_leaf(&mut self, start: &G, state: &G, remaining: u32) -> i32 {
        let depth_from_root = self.max_depth - remaining;
        let score = self
            .evaluator
            .score(start, state, depth_from_root, self.max_depth);
        self.evaluation_count += 1;
        self.listeners.emit_leaf_evaluation(state, score, depth_from_root);
        score
    }

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

    /// The principal-variation child step. The child state is unchanged by
    /// the probe, so the re-search reuses the same checked-out object.
    fn search_child(
        &mut self,
        start: &G,
        child: &G,
        mut ranker: Option<&mut (dyn MoveRanker<G> + '_)>,
        remaining: u32,
        alpha: i32,
        beta: i32,
        first: bool,
    ) -> Result<i32, SearchError> {
        if first {
            let score = self.search(start, child, ranker, remaining - 1, -beta, -alpha, false)?;
            return Ok(-score);
        }

        // Null-window probe
        let score = -self.search(
            start,
            child,
            ranker.as_deref_mut(),
            remaining - 1,
            -(alpha + 1),
            -alpha,
            false,
        )?;

        // Probe landed inside the real window: re-search with full width.
        // Shallow subtrees (remaining == 1) are exact already.
        if remaining > 1 && score > alpha && score < beta {
            let full =
                self.search(start, child, ranker, remaining - 1, -beta, -score, false)?;
            return Ok(-full);
        }
        Ok(score)
    }

    /// The negascout recursion. Alpha-beta cutoff is always active.
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

        if remaining == 0 || state.is_game_over() {
            return Ok(self.score_leaf(start, state, remaining));
        }

        let moves = self.ordered_moves(state, ranker.as_deref_mut(), remaining);

        if moves.is_empty() {
            if !self.config.allow_byes {
                return Ok(self.score_leaf(start, state, remaining));
            }
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
        let mut first = true;
        for mv in moves {
            let mut child = self.checkout_child(state)?;
            if child.apply_move(&mv, true) == 0 {
                self.ctx.pool().checkin(child);
                continue;
            }

            let result = self.search_child(
                start,
                &child,
                ranker.as_deref_mut(),
                remaining,
                alpha,
                beta,
                first,
            );
            self.ctx.pool().checkin(child);
            let score = result?;

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

            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
            first = false;
        }

        Ok(best)
    }
}

impl<G: GameState> MoveSearcher for NegascoutSearcher<'_, G> {
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
            "negascout search done: depth {}, score {}, {} evaluations",
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
