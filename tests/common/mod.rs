//! Shared fixture: a three-ply game tree with hand-computed values.
//!
//! ```text
//! A(p0) -b-> B(p1) -d-> D(p0) -h-> H   eval(H, p1) = 3
//!                       |      -i-> I   eval(I, p1) = 4
//!                       -e-> E(p0) -j-> J   eval(J, p1) = 3
//!       -c-> C(p1) -f-> F(p0) -k-> K   eval(K, p1) = 5
//!                  -g-> G(p0) -l-> L   eval(L, p1) = 0
//!                              -m-> M   eval(M, p1) = 2
//! ```
//!
//! Negamax at depth 3: value(D) = max(-3, -4) = -3, value(E) = -3,
//! value(B) = max(3, 3) = 3, value(F) = -5, value(G) = max(0, -2) = 0,
//! value(C) = max(5, 0) = 5, so the root picks "b" with score
//! max(-3, -5) = -3.

use gametree::dummy::{DummyGame, DummyMoveFactory, TableEvaluator, TreeSpec};
use gametree::{GameContext, StatePool};
use std::sync::Arc;

pub fn fixture_tree() -> Arc<TreeSpec> {
    Arc::new(
        TreeSpec::new("A")
            .moves("A", 0, &[("b", "B"), ("c", "C")])
            .moves("B", 1, &[("d", "D"), ("e", "E")])
            .moves("C", 1, &[("f", "F"), ("g", "G")])
            .moves("D", 0, &[("h", "H"), ("i", "I")])
            .moves("E", 0, &[("j", "J")])
            .moves("F", 0, &[("k", "K")])
            .moves("G", 0, &[("l", "L"), ("m", "M")]),
    )
}

pub fn fixture_eval() -> TableEvaluator {
    TableEvaluator::new(0)
        .set("H", 1, 3)
        .set("I", 1, 4)
        .set("J", 1, 3)
        .set("K", 1, 5)
        .set("L", 1, 0)
        .set("M", 1, 2)
}

pub fn context(tree: Arc<TreeSpec>) -> GameContext<DummyGame> {
    // RUST_LOG=debug surfaces the searchers' per-pass lines during a test run
    let _ = env_logger::builder().is_test(true).try_init();
    let pool_tree = tree.clone();
    let pool = StatePool::with_factory(None, move || Ok(DummyGame::new(pool_tree.clone())));
    GameContext::new(vec![0, 1], pool, Box::new(DummyMoveFactory), (), false)
        .expect("fixture context")
}
