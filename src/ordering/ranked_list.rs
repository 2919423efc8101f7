// Ranked move list: insertion-ordered descending by rank

use rand::Rng;
use smallvec::SmallVec;

/// A `(move, rank)` entry in a [`RankedMoveList`].
#[derive(Debug, Clone, Copy)]
struct RankedMove<M> {
    mv: M,
    rank: i32,
}

/// Ordered collection of moves, kept in descending rank order as entries
/// arrive.
///
/// Built fresh for every tree node and discarded once the node's children
/// have been enumerated. Two tie-break policies:
///
/// - **Stable** (default): entries with equal rank keep insertion order.
/// - **Randomized**: a new entry lands at a uniformly random position within
///   the contiguous run of equal-rank entries (including both ends of the
///   run), so repeated searches do not systematically favour the first or
///   last equally ranked move.
#[derive(Debug)]
pub struct RankedMoveList<M> {
    entries: SmallVec<[RankedMove<M>; 16]>,
    randomize: bool,
}

impl<M> RankedMoveList<M> {
    pub fn new(randomize_equal_ranks: bool) -> Self {
        RankedMoveList {
            entries: SmallVec::new(),
            randomize: randomize_equal_ranks,
        }
    }

    /// Insert with rank 0, preserving arrival order. Used when no ranker is
    /// configured.
    pub fn add(&mut self, mv: M) {
        // Stable insert at the end of the rank-0 band: plain arrival order
        // when everything is unranked, still descending if ranks were mixed.
        let at = self.stable_position(0);
        self.entries.insert(at, RankedMove { mv, rank: 0 });
    }

    /// Insert maintaining descending-rank order, applying the configured
    /// tie-break policy among equal ranks.
    pub fn add_ranked(&mut self, mv: M, rank: i32) {
        let at = if self.randomize {
            self.randomized_position(rank)
        } else {
            self.stable_position(rank)
        };
        self.entries.insert(at, RankedMove { mv, rank });
    }

    /// First index whose entry ranks strictly below `rank`: inserting there
    /// keeps descending order and puts the new entry after existing equals.
    fn stable_position(&self, rank: i32) -> usize {
        self.entries
            .iter()
            .position(|e| e.rank < rank)
            .unwrap_or(self.entries.len())
    }

    /// Uniformly random position within the equal-rank band. `lo` is the
    /// first index not ranked above `rank`, `hi` the first ranked below it;
    /// every slot in `lo..=hi` is a legal target.
    fn randomized_position(&self, rank: i32) -> usize {
        let lo = self
            .entries
            .iter()
            .position(|e| e.rank <= rank)
            .unwrap_or(self.entries.len());
        let hi = self.stable_position(rank);
        rand::thread_rng().gen_range(lo..=hi)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The final ordering, highest rank first.
    pub fn into_moves(self) -> SmallVec<[M; 16]> {
        self.entries.into_iter().map(|e| e.mv).collect()
    }

    /// Iterate `(move, rank)` pairs in list order.
    pub fn iter(&self) -> impl Iterator<Item = (&M, i32)> {
        self.entries.iter().map(|e| (&e.mv, e.rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves_of(list: RankedMoveList<&'static str>) -> Vec<&'static str> {
        list.into_moves().into_vec()
    }

    #[test]
    fn test_descending_rank_order() {
        let mut list = RankedMoveList::new(false);
        for (mv, rank) in [("A", 3), ("B", 1), ("C", 2), ("D", 5), ("E", 4)] {
            list.add_ranked(mv, rank);
        }
        assert_eq!(moves_of(list), vec!["D", "E", "A", "C", "B"]);
    }

    #[test]
    fn test_equal_ranks_keep_insertion_order_when_stable() {
        let mut list = RankedMoveList::new(false);
        list.add_ranked("first", 7);
        list.add_ranked("second", 7);
        list.add_ranked("third", 7);
        list.add_ranked("best", 9);
        assert_eq!(moves_of(list), vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn test_unranked_add_preserves_arrival_order() {
        let mut list = RankedMoveList::new(true); // randomization must not apply
        list.add("x");
        list.add("y");
        list.add("z");
        assert_eq!(moves_of(list), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_randomized_insert_stays_inside_rank_band() {
        // Whatever the random choices, rank order must survive and the
        // result must be a permutation of the input.
        for _ in 0..50 {
            let mut list = RankedMoveList::new(true);
            for (mv, rank) in [("a", 1), ("b", 2), ("c", 2), ("d", 2), ("e", 3)] {
                list.add_ranked(mv, rank);
            }
            let ranks: Vec<i32> = list.iter().map(|(_, r)| r).collect();
            assert_eq!(ranks, vec![3, 2, 2, 2, 1]);

            let mut moves = moves_of(list);
            moves.sort_unstable();
            assert_eq!(moves, vec!["a", "b", "c", "d", "e"]);
        }
    }

    #[test]
    fn test_randomized_insert_hits_every_band_slot() {
        // Three equal-rank entries: the third insert has three legal slots.
        // 200 trials make missing one astronomically unlikely.
        let mut seen = [false; 3];
        for _ in 0..200 {
            let mut list = RankedMoveList::new(true);
            list.add_ranked("a", 5);
            list.add_ranked("b", 5);
            list.add_ranked("probe", 5);
            let pos = list
                .iter()
                .position(|(mv, _)| *mv == "probe")
                .expect("probe present");
            seen[pos] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_len_and_empty() {
        let mut list = RankedMoveList::new(false);
        assert!(list.is_empty());
        list.add_ranked("a", 1);
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
    }
}
