//! A game built from an explicit move tree, for tests, demos and benches.
//!
//! Real games derive their move graphs from rules; `DummyGame` is handed the
//! graph directly, which makes it ideal for pinning down searcher behaviour:
//! every node, edge and evaluation is spelled out, so expected scores can be
//! worked out by hand. Edges are keyed by `(node, player)`, so positions
//! where only one side can move (byes) are expressible.

use crate::error::SearchError;
use crate::game::{Evaluator, GameState, MoveFactory};
use std::collections::HashMap;
use std::sync::Arc;

/// Move label in a [`DummyGame`] tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DummyMove(pub String);

/// An explicit game tree: named nodes, per-player labelled edges.
#[derive(Debug, Default)]
pub struct TreeSpec {
    root: String,
    first_player: usize,
    edges: HashMap<(String, usize), Vec<(String, String)>>,
}

impl TreeSpec {
    /// Empty tree rooted at `root`, player 0 to move.
    pub fn new(root: &str) -> Self {
        TreeSpec {
            root: root.to_string(),
            first_player: 0,
            edges: HashMap::new(),
        }
    }

    pub fn with_first_player(mut self, player: usize) -> Self {
        self.first_player = player;
        self
    }

    /// Give `player` the labelled moves `edges` at `node`.
    pub fn moves(mut self, node: &str, player: usize, edges: &[(&str, &str)]) -> Self {
        self.edges
            .entry((node.to_string(), player))
            .or_default()
            .extend(
                edges
                    .iter()
                    .map(|(label, target)| (label.to_string(), target.to_string())),
            );
        self
    }

    /// A chain of nodes with alternating players, each move labelled after
    /// its target node.
    pub fn linear(nodes: &[&str]) -> Self {
        let mut spec = TreeSpec::new(nodes.first().copied().unwrap_or("root"));
        for (i, pair) in nodes.windows(2).enumerate() {
            spec = spec.moves(pair[0], i % 2, &[(pair[1], pair[1])]);
        }
        spec
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn moves_from(&self, node: &str, player: usize) -> &[(String, String)] {
        self.edges
            .get(&(node.to_string(), player))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn any_player_can_move(&self, node: &str) -> bool {
        self.edges
            .iter()
            .any(|((n, _), edges)| n == node && !edges.is_empty())
    }
}

/// [`GameState`] implementation over a shared [`TreeSpec`].
#[derive(Debug, Clone)]
pub struct DummyGame {
    tree: Arc<TreeSpec>,
    node: String,
    player: usize,
    made: u32,
    last: Option<DummyMove>,
}

impl DummyGame {
    pub fn new(tree: Arc<TreeSpec>) -> Self {
        let node = tree.root().to_string();
        let player = tree.first_player;
        DummyGame {
            tree,
            node,
            player,
            made: 0,
            last: None,
        }
    }

    /// The node this state currently sits on.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// The player to move (0 or 1).
    pub fn player(&self) -> usize {
        self.player
    }
}

impl GameState for DummyGame {
    type Move = DummyMove;
    type Player = usize;
    type Params = ();

    fn initialise(&mut self) {
        self.node = self.tree.root().to_string();
        self.player = self.tree.first_player;
        self.made = 0;
        self.last = None;
    }

    fn current_player(&self) -> usize {
        self.player
    }

    fn is_game_over(&self) -> bool {
        !self.tree.any_player_can_move(&self.node)
    }

    fn last_move(&self) -> Option<DummyMove> {
        self.last.clone()
    }

    fn legal_moves(&self) -> Vec<DummyMove> {
        self.tree
            .moves_from(&self.node, self.player)
            .iter()
            .map(|(label, _)| DummyMove(label.clone()))
            .collect()
    }

    fn moves_made(&self) -> u32 {
        self.made
    }

    fn apply_move(&mut self, mv: &DummyMove, _is_searching: bool) -> u32 {
        let target = self
            .tree
            .moves_from(&self.node, self.player)
            .iter()
            .find(|(label, _)| *label == mv.0)
            .map(|(_, target)| target.clone());
        match target {
            Some(target) => {
                self.node = target;
                self.player = 1 - self.player;
                self.made += 1;
                self.last = Some(mv.clone());
                1
            }
            None => 0,
        }
    }

    fn pass_turn(&mut self) {
        self.player = 1 - self.player;
    }

    fn copy_from(&mut self, other: &Self) {
        self.tree = other.tree.clone();
        self.node = other.node.clone();
        self.player = other.player;
        self.made = other.made;
        self.last = other.last.clone();
    }
}

/// Evaluator backed by an explicit `(node, player to move) -> score` table.
#[derive(Debug, Default)]
pub struct TableEvaluator {
    scores: HashMap<(String, usize), i32>,
    default_score: i32,
}

impl TableEvaluator {
    pub fn new(default_score: i32) -> Self {
        TableEvaluator {
            scores: HashMap::new(),
            default_score,
        }
    }

    /// Score `node` as `score` when `player` is to move there.
    pub fn set(mut self, node: &str, player: usize, score: i32) -> Self {
        self.scores.insert((node.to_string(), player), score);
        self
    }
}

impl Evaluator<DummyGame> for TableEvaluator {
    fn score(&self, _start: &DummyGame, state: &DummyGame, _depth: u32, _max: u32) -> i32 {
        self.scores
            .get(&(state.node.clone(), state.player))
            .copied()
            .unwrap_or(self.default_score)
    }
}

/// Move factory mapping text straight to a [`DummyMove`] label.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyMoveFactory;

impl MoveFactory<DummyGame> for DummyMoveFactory {
    fn from_text(&self, text: &str) -> Result<DummyMove, SearchError> {
        if text.is_empty() {
            return Err(SearchError::InvalidArgument("empty move text".into()));
        }
        Ok(DummyMove(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Arc<TreeSpec> {
        Arc::new(
            TreeSpec::new("A")
                .moves("A", 0, &[("b", "B"), ("c", "C")])
                .moves("B", 1, &[("d", "D")]),
        )
    }

    #[test]
    fn test_moves_and_application() {
        let mut game = DummyGame::new(tree());
        assert_eq!(game.node(), "A");
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.legal_moves().len(), 2);

        assert_eq!(game.apply_move(&DummyMove("b".into()), true), 1);
        assert_eq!(game.node(), "B");
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.moves_made(), 1);
        assert_eq!(game.last_move(), Some(DummyMove("b".into())));

        // Illegal label is a no-op
        assert_eq!(game.apply_move(&DummyMove("zzz".into()), true), 0);
        assert_eq!(game.node(), "B");
    }

    #[test]
    fn test_game_over_when_nobody_can_move() {
        let mut game = DummyGame::new(tree());
        assert!(!game.is_game_over());
        game.apply_move(&DummyMove("c".into()), true);
        assert!(game.is_game_over()); // C has no outgoing edges
    }

    #[test]
    fn test_not_game_over_when_only_opponent_can_move() {
        // At P only player 1 has a move: player 0 to move is a bye, not an
        // end of game.
        let spec = Arc::new(TreeSpec::new("P").moves("P", 1, &[("q", "Q")]));
        let game = DummyGame::new(spec);
        assert_eq!(game.current_player(), 0);
        assert!(game.legal_moves().is_empty());
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_copy_from_and_initialise() {
        let mut a = DummyGame::new(tree());
        a.apply_move(&DummyMove("b".into()), true);

        let mut b = DummyGame::new(tree());
        b.copy_from(&a);
        assert_eq!(b.node(), "B");
        assert_eq!(b.current_player(), 1);
        assert_eq!(b.moves_made(), 1);

        b.initialise();
        assert_eq!(b.node(), "A");
        assert_eq!(b.current_player(), 0);
        assert_eq!(b.moves_made(), 0);
        assert!(b.last_move().is_none());
    }

    #[test]
    fn test_table_evaluator_lookup() {
        let eval = TableEvaluator::new(-7).set("B", 1, 42);
        let mut game = DummyGame::new(tree());
        let start = game.clone();
        game.apply_move(&DummyMove("b".into()), true);
        assert_eq!(eval.score(&start, &game, 1, 3), 42);

        let mut other = DummyGame::new(tree());
        other.apply_move(&DummyMove("c".into()), true);
        assert_eq!(eval.score(&start, &other, 1, 3), -7);
    }

    #[test]
    fn test_move_factory_rejects_empty() {
        assert!(DummyMoveFactory.from_text("").is_err());
        assert_eq!(
            DummyMoveFactory.from_text("d4").unwrap(),
            DummyMove("d4".into())
        );
    }
}
