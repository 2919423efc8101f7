// Killer-move heuristic layered over a delegate ranker
//
// A move that scored well at some ply in one branch is likely to be strong
// at sibling nodes of the same ply, so trying it first raises the chance of
// an early alpha-beta cutoff. The decorator keeps a small per-depth list of
// such moves and ranks them above anything the delegate can produce.

use super::MoveRanker;
use crate::game::GameState;
use std::collections::HashMap;

/// Offset added to a killer move's stored score when ranking.
///
/// Delegate rankers must keep their scores below this so recorded killers
/// always outrank ordinary moves.
pub const KILLER_BASE: i32 = 1 << 20;

/// Fixed-capacity list of the best-scoring moves seen at one depth, sorted
/// descending by score.
#[derive(Debug, Clone)]
struct KillerMoveList<M> {
    entries: Vec<(M, i32)>,
    capacity: usize,
}

impl<M: Clone + Eq> KillerMoveList<M> {
    fn new(capacity: usize) -> Self {
        KillerMoveList {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn score_of(&self, mv: &M) -> Option<i32> {
        self.entries
            .iter()
            .find(|(m, _)| m == mv)
            .map(|&(_, score)| score)
    }

    /// Record `score` for `mv`. An existing entry's score is raised, never
    /// lowered; a new move is inserted in descending-score position, and the
    /// worst entry is evicted when the list is full.
    fn record(&mut self, mv: &M, score: i32) {
        if let Some(pos) = self.entries.iter().position(|(m, _)| m == mv) {
            if score > self.entries[pos].1 {
                self.entries[pos].1 = score;
                self.entries.sort_by(|a, b| b.1.cmp(&a.1));
            }
            return;
        }
        let at = self
            .entries
            .iter()
            .position(|&(_, s)| s < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, (mv.clone(), score));
        self.entries.truncate(self.capacity);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// [`MoveRanker`] decorator implementing the killer-move heuristic.
///
/// Keeps one killer list per depth value, each holding up to
/// `killers_per_level` moves. `rank` returns `KILLER_BASE + stored score`
/// for a recorded killer at that depth and otherwise defers to the delegate;
/// `on_evaluation` feeds the per-depth lists; `reset` clears them and resets
/// the delegate. The lists survive across iterative-deepening passes unless
/// the caller resets explicitly.
#[derive(Debug)]
pub struct KillerHeuristicMoveRanker<G: GameState, R> {
    delegate: R,
    killers_per_level: usize,
    levels: HashMap<u32, KillerMoveList<G::Move>>,
}

impl<G: GameState, R: MoveRanker<G>> KillerHeuristicMoveRanker<G, R> {
    pub fn new(delegate: R, killers_per_level: usize) -> Self {
        KillerHeuristicMoveRanker {
            delegate,
            killers_per_level,
            levels: HashMap::new(),
        }
    }

    /// The wrapped delegate ranker.
    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    /// Number of killers currently recorded at `depth`.
    pub fn killer_count(&self, depth: u32) -> usize {
        self.levels.get(&depth).map_or(0, KillerMoveList::len)
    }
}

impl<G: GameState, R: MoveRanker<G>> MoveRanker<G> for KillerHeuristicMoveRanker<G, R> {
    fn rank(&self, mv: &G::Move, state: &G, depth: u32) -> i32 {
        if let Some(score) = self.levels.get(&depth).and_then(|l| l.score_of(mv)) {
            return KILLER_BASE + score;
        }
        self.delegate.rank(mv, state, depth)
    }

    fn on_evaluation(&mut self, mv: &G::Move, state: &G, score: i32, player: G::Player, depth: u32) {
        self.levels
            .entry(depth)
            .or_insert_with(|| KillerMoveList::new(self.killers_per_level))
            .record(mv, score);
        self.delegate.on_evaluation(mv, state, score, player, depth);
    }

    fn reset(&mut self) {
        self.levels.clear();
        self.delegate.reset();
    }
}
