//! Capability contracts consumed by the search core.
//!
//! The engine knows nothing about any concrete game. Everything it needs is
//! expressed through the traits in this module:
//! - [`GameState`] — a mutable, pool-recyclable position
//! - [`Evaluator`] — static scoring of a position
//! - [`MoveFactory`] — parsing moves from text (human-input collaborators)
//! - [`OpeningLibrary`] — a precomputed early-game move source
//!
//! # Design Philosophy
//!
//! The traits focus on **behaviour** rather than construction: a chess
//! position, a connect-four grid and a synthetic test tree all need wildly
//! different constructors, so none is prescribed here. What they share is the
//! lifecycle the searcher drives: checked out of the pool, loaded from a
//! parent via `copy_from`, advanced with `apply_move`, and checked back in.

use crate::error::SearchError;
use std::fmt::Debug;

/// A mutable, recyclable game position.
///
/// Implementations are **pool-managed**: the searcher never constructs one ad
/// hoc. Each object is created once per pool slot, re-initialised on every
/// checkout and cleared again on checkin, so implementations must be fully
/// reusable after `on_checkin`.
///
/// Scores are always interpreted from the perspective of the player returned
/// by [`current_player`](GameState::current_player); the negamax searchers
/// rely on that convention when they negate child scores.
pub trait GameState {
    /// Opaque move value. The searcher only needs equality and a stable
    /// ordering; it never interprets the internals.
    type Move: Clone + Eq + Ord + Debug;

    /// Opaque player identifier.
    type Player: Copy + Eq + Debug;

    /// Parameters handed to the pool lifecycle hooks on checkout/recycle
    /// (board dimensions, rule variants, ...). Use `()` when nothing is
    /// needed.
    type Params;

    /// Reset this state to the start of a game.
    fn initialise(&mut self);

    /// The player whose turn it is.
    fn current_player(&self) -> Self::Player;

    /// Whether the game has ended in this position. A finished position is
    /// scored as a leaf at any remaining depth.
    fn is_game_over(&self) -> bool;

    /// The move that produced this position, if any.
    fn last_move(&self) -> Option<Self::Move>;

    /// All legal moves for the current player, in the game's natural order.
    /// The searcher applies any configured [`MoveRanker`] on top of this.
    ///
    /// [`MoveRanker`]: crate::ordering::MoveRanker
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Number of moves played to reach this position.
    fn moves_made(&self) -> u32;

    /// Upper bound on the number of moves the game can still last. Searchers
    /// clamp their depth to this. Default: unbounded.
    fn max_moves_remaining(&self) -> u32 {
        u32::MAX
    }

    /// Apply `mv` to this position, switching the turn to the next player.
    ///
    /// Returns the number of changes made; `0` signals an illegal or no-op
    /// move, which the searcher skips. `is_searching` is true when the call
    /// comes from inside a tree search, letting games skip presentation
    /// bookkeeping on the hot path.
    fn apply_move(&mut self, mv: &Self::Move, is_searching: bool) -> u32;

    /// Hand the turn to the next player without playing a move (a bye).
    /// Only invoked by searchers configured with `allow_byes`.
    fn pass_turn(&mut self);

    /// Make this state an exact copy of `other`. Used to materialise child
    /// nodes from pool-recycled objects.
    fn copy_from(&mut self, other: &Self);

    /// Pool hook: the object was freshly constructed and is being handed out
    /// for the first time.
    fn on_checkout(&mut self, _params: &Self::Params) {}

    /// Pool hook: the object is being reused from the free list.
    fn on_recycle(&mut self, _params: &Self::Params) {}

    /// Pool hook: the object is going back on the free list.
    fn on_checkin(&mut self) {}
}

/// Static evaluation of a position.
///
/// `score` is always from the perspective of `state`'s current player:
/// positive is good for the side to move. `current_depth` is the distance
/// from the search root, `search_depth` the full depth of this search, which
/// lets evaluators prefer faster wins.
pub trait Evaluator<G: GameState> {
    fn score(&self, start: &G, state: &G, current_depth: u32, search_depth: u32) -> i32;
}

/// Builds moves from textual input.
///
/// Used by human-input collaborators, not by the searchers themselves; it
/// lives in the [`GameContext`](crate::context::GameContext) so front ends
/// share one parser per game session.
pub trait MoveFactory<G: GameState> {
    /// Parse a move from text. Fails with
    /// [`SearchError::InvalidArgument`] when the text is not recognised.
    fn from_text(&self, text: &str) -> Result<G::Move, SearchError>;
}

/// A precomputed lookup of early-game moves.
///
/// When [`should_use_library`](OpeningLibrary::should_use_library) claims a
/// position, the searcher returns the library move directly: no tree is
/// built and no progress events fire.
pub trait OpeningLibrary<G: GameState> {
    fn should_use_library(&self, state: &G, depth: u32) -> bool;

    /// The library move for this position, or `None` when the library has no
    /// line after all (the searcher then falls back to the tree).
    fn find_move(&self, state: &G, depth: u32) -> Option<G::Move>;
}
