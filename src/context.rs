//! Immutable per-session wiring shared by every search component.

use crate::error::SearchError;
use crate::game::{GameState, MoveFactory};
use crate::pool::StatePool;

/// The wiring object handed (by reference) to every searcher.
///
/// Holds the ordered player list, the state pool, the move factory, the
/// parameters used for pool checkouts and the equal-rank tie-break policy.
/// Created once per game session and never mutated afterwards; the pool's
/// internal free/checked-out lists are the only mutable parts it exposes.
pub struct GameContext<G: GameState> {
    players: Vec<G::Player>,
    pool: StatePool<G>,
    move_factory: Box<dyn MoveFactory<G>>,
    checkout_params: G::Params,
    randomize_equal_ranks: bool,
}

impl<G: GameState> GameContext<G> {
    /// Build a context. Fails with [`SearchError::InvalidArgument`] when the
    /// player list is empty or contains duplicates.
    pub fn new(
        players: Vec<G::Player>,
        pool: StatePool<G>,
        move_factory: Box<dyn MoveFactory<G>>,
        checkout_params: G::Params,
        randomize_equal_ranks: bool,
    ) -> Result<Self, SearchError> {
        if players.is_empty() {
            return Err(SearchError::InvalidArgument(
                "a game context needs at least one player".into(),
            ));
        }
        for (i, player) in players.iter().enumerate() {
            if players[..i].contains(player) {
                return Err(SearchError::InvalidArgument(format!(
                    "duplicate player {player:?} in context"
                )));
            }
        }
        Ok(GameContext {
            players,
            pool,
            move_factory,
            checkout_params,
            randomize_equal_ranks,
        })
    }

    /// The ordered set of players in this session.
    pub fn players(&self) -> &[G::Player] {
        &self.players
    }

    /// The player whose turn follows `player`, cycling through the list.
    /// Fails with [`SearchError::InvalidArgument`] for an unknown player.
    pub fn next_player(&self, player: G::Player) -> Result<G::Player, SearchError> {
        let idx = self
            .players
            .iter()
            .position(|p| *p == player)
            .ok_or_else(|| {
                SearchError::InvalidArgument(format!("player {player:?} is not in this context"))
            })?;
        Ok(self.players[(idx + 1) % self.players.len()])
    }

    /// The shared state pool.
    pub fn pool(&self) -> &StatePool<G> {
        &self.pool
    }

    /// The move factory for this game.
    pub fn move_factory(&self) -> &dyn MoveFactory<G> {
        self.move_factory.as_ref()
    }

    /// Parameters passed to the pool lifecycle hooks on every checkout.
    pub fn checkout_params(&self) -> &G::Params {
        &self.checkout_params
    }

    /// Whether equally ranked moves are shuffled into a random order
    /// instead of keeping insertion order.
    pub fn randomize_equal_ranks(&self) -> bool {
        self.randomize_equal_ranks
    }
}

impl<G: GameState> std::fmt::Debug for GameContext<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("players", &self.players)
            .field("pool", &self.pool)
            .field("randomize_equal_ranks", &self.randomize_equal_ranks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyGame, DummyMoveFactory, TreeSpec};
    use std::sync::Arc;

    fn pool() -> StatePool<DummyGame> {
        let tree = Arc::new(TreeSpec::linear(&["A", "B"]));
        StatePool::with_factory(None, move || Ok(DummyGame::new(tree.clone())))
    }

    fn context(players: Vec<usize>) -> Result<GameContext<DummyGame>, SearchError> {
        GameContext::new(players, pool(), Box::new(DummyMoveFactory), (), false)
    }

    #[test]
    fn test_requires_at_least_one_player() {
        let err = context(vec![]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_duplicate_players() {
        let err = context(vec![0, 1, 0]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_next_player_cycles() {
        let ctx = context(vec![0, 1]).unwrap();
        assert_eq!(ctx.next_player(0).unwrap(), 1);
        assert_eq!(ctx.next_player(1).unwrap(), 0);
    }

    #[test]
    fn test_next_player_rejects_strangers() {
        let ctx = context(vec![0, 1]).unwrap();
        assert!(matches!(
            ctx.next_player(7),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_move_factory_is_reachable() {
        let ctx = context(vec![0, 1]).unwrap();
        let mv = ctx.move_factory().from_text("b").unwrap();
        assert_eq!(format!("{mv:?}"), "DummyMove(\"b\")");
    }
}
