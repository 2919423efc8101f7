//! Search progress observation.
//!
//! Searchers report their traversal through listener callbacks, fired in the
//! exact order nodes are visited: `on_branch` pre-order before a node's
//! children are expanded, `on_node_evaluation` after each child has been
//! scored, `on_leaf_evaluation` when the evaluator runs, and `on_iteration`
//! at the start of each iterative-deepening pass. Diagnostics and statistics
//! collectors hang off these; the searchers themselves never do I/O.

use crate::game::GameState;
use std::cell::RefCell;
use std::rc::Rc;

/// Observer callbacks fired by a searcher. All methods default to no-ops, so
/// implementations override only what they care about.
pub trait SearchProgressListener<G: GameState> {
    /// An iterative-deepening pass is starting.
    fn on_iteration(&mut self, _iteration: u32, _depth: u32) {}

    /// A node is about to have its children expanded. `remaining_depth` is
    /// the plies left below this node; a bye node reports here too.
    fn on_branch(&mut self, _state: &G, _remaining_depth: u32) {}

    /// A child move has been fully scored.
    fn on_node_evaluation(&mut self, _mv: &G::Move, _score: i32, _remaining_depth: u32) {}

    /// The static evaluator scored a leaf, `depth_from_root` plies down.
    fn on_leaf_evaluation(&mut self, _state: &G, _score: i32, _depth_from_root: u32) {}
}

/// Shared handle to a registered listener.
pub type ListenerHandle<G> = Rc<RefCell<dyn SearchProgressListener<G>>>;

/// Ordered collection of listener handles with linear add/remove.
///
/// Listeners are invoked in registration order. Removal is by handle
/// identity, so the same listener object can be registered on several
/// searchers and detached from one without touching the others.
pub struct ListenerSet<G: GameState> {
    listeners: Vec<ListenerHandle<G>>,
}

impl<G: GameState> ListenerSet<G> {
    pub fn new() -> Self {
        ListenerSet {
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: ListenerHandle<G>) {
        self.listeners.push(listener);
    }

    /// Detach `listener`; returns whether it was registered.
    pub fn remove(&mut self, listener: &ListenerHandle<G>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit_iteration(&self, iteration: u32, depth: u32) {
        for l in &self.listeners {
            l.borrow_mut().on_iteration(iteration, depth);
        }
    }

    pub fn emit_branch(&self, state: &G, remaining_depth: u32) {
        for l in &self.listeners {
            l.borrow_mut().on_branch(state, remaining_depth);
        }
    }

    pub fn emit_node_evaluation(&self, mv: &G::Move, score: i32, remaining_depth: u32) {
        for l in &self.listeners {
            l.borrow_mut().on_node_evaluation(mv, score, remaining_depth);
        }
    }

    pub fn emit_leaf_evaluation(&self, state: &G, score: i32, depth_from_root: u32) {
        for l in &self.listeners {
            l.borrow_mut().on_leaf_evaluation(state, score, depth_from_root);
        }
    }
}

impl<G: GameState> Default for ListenerSet<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameState> std::fmt::Debug for ListenerSet<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyGame, TreeSpec};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counting {
        branches: u32,
        leaves: u32,
    }

    impl SearchProgressListener<DummyGame> for Counting {
        fn on_branch(&mut self, _state: &DummyGame, _remaining: u32) {
            self.branches += 1;
        }
        fn on_leaf_evaluation(&mut self, _state: &DummyGame, _score: i32, _depth: u32) {
            self.leaves += 1;
        }
    }

    #[test]
    fn test_add_remove_and_fanout() {
        let state = DummyGame::new(Arc::new(TreeSpec::linear(&["A"])));
        let mut set: ListenerSet<DummyGame> = ListenerSet::new();

        let a: Rc<RefCell<Counting>> = Rc::new(RefCell::new(Counting::default()));
        let b: Rc<RefCell<Counting>> = Rc::new(RefCell::new(Counting::default()));
        let ha: ListenerHandle<DummyGame> = a.clone();
        let hb: ListenerHandle<DummyGame> = b.clone();

        set.add(ha.clone());
        set.add(hb.clone());
        assert_eq!(set.len(), 2);

        set.emit_branch(&state, 3);
        set.emit_leaf_evaluation(&state, 0, 3);
        assert_eq!(a.borrow().branches, 1);
        assert_eq!(b.borrow().leaves, 1);

        assert!(set.remove(&ha));
        assert!(!set.remove(&ha));
        set.emit_branch(&state, 2);
        assert_eq!(a.borrow().branches, 1);
        assert_eq!(b.borrow().branches, 2);
    }
}
