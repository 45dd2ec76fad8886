//! Transposition Table for caching search results
//!
//! The table maps a position fingerprint to the best point found there, its
//! value and a depth tag. The tag is the ply distance from the search root
//! at which the entry was computed, so a smaller tag means more plies were
//! searched below it.
//!
//! # Example
//!
//! ```
//! use knight6::board::Point;
//! use knight6::search::TranspositionTable;
//!
//! let mut tt = TranspositionTable::new();
//! let hash = 0x1234_5678_9ABC_DEF0;
//!
//! // Computed two plies below the root
//! tt.store(hash, Point::new(9, 9), 100, 2);
//!
//! // Usable by a node at depth 2 or deeper, not by one nearer the root
//! assert_eq!(tt.probe(hash, 3), Some((Point::new(9, 9), 100)));
//! assert_eq!(tt.probe(hash, 1), None);
//! ```

use rustc_hash::FxHashMap;

use crate::board::Point;

/// Transposition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Best point found for this position
    pub best_point: Point,
    /// Value of the position after `best_point`
    pub value: i32,
    /// Plies from the root when this was computed
    pub depth: u8,
}

/// Unbounded fingerprint cache, one entry per key.
///
/// Entries are never evicted; the table lives as long as its engine.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<u64, TTEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe the table for a position.
    ///
    /// Hits only when the stored entry was computed at `depth` or nearer
    /// the root, i.e. with at least as many plies left as the caller has.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: u8) -> Option<(Point, i32)> {
        self.entries
            .get(&hash)
            .filter(|e| e.depth <= depth)
            .map(|e| (e.best_point, e.value))
    }

    /// Raw entry regardless of depth
    #[must_use]
    pub fn entry(&self, hash: u64) -> Option<&TTEntry> {
        self.entries.get(&hash)
    }

    /// Store a position in the table.
    ///
    /// An existing entry is replaced only by one computed at the same depth
    /// or nearer the root.
    pub fn store(&mut self, hash: u64, best_point: Point, value: i32, depth: u8) {
        let entry = TTEntry {
            best_point,
            value,
            depth,
        };
        self.entries
            .entry(hash)
            .and_modify(|old| {
                if depth <= old.depth {
                    *old = entry;
                }
            })
            .or_insert(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries in the table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get statistics about table usage.
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let mut by_depth = [0usize; 16];
        for e in self.entries.values() {
            by_depth[usize::from(e.depth).min(15)] += 1;
        }
        TTStats {
            entries: self.entries.len(),
            by_depth,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    /// Number of stored positions
    pub entries: usize,
    /// Entry count per depth tag; the last slot collects deeper tags
    pub by_depth: [usize; 16],
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: u64 = 0x1234_5678_9ABC_DEF0;

    #[test]
    fn test_tt_store_probe() {
        let mut tt = TranspositionTable::new();
        tt.store(HASH, Point::new(9, 9), 100, 2);

        assert_eq!(tt.probe(HASH, 2), Some((Point::new(9, 9), 100)));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_tt_depth_requirement() {
        let mut tt = TranspositionTable::new();
        tt.store(HASH, Point::new(5, 5), 100, 3);

        // A node nearer the root needs more plies than the entry has
        assert_eq!(tt.probe(HASH, 2), None);
        assert_eq!(tt.probe(HASH, 3), Some((Point::new(5, 5), 100)));
        assert_eq!(tt.probe(HASH, 4), Some((Point::new(5, 5), 100)));
    }

    #[test]
    fn test_tt_miss() {
        let tt = TranspositionTable::new();
        assert!(tt.is_empty());
        assert_eq!(tt.probe(HASH, 10), None);
    }

    #[test]
    fn test_tt_replacement_nearer_root() {
        let mut tt = TranspositionTable::new();
        tt.store(HASH, Point::new(1, 1), 10, 4);
        tt.store(HASH, Point::new(2, 2), 20, 1);

        assert_eq!(tt.probe(HASH, 1), Some((Point::new(2, 2), 20)));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_tt_replacement_same_depth() {
        let mut tt = TranspositionTable::new();
        tt.store(HASH, Point::new(1, 1), 10, 2);
        tt.store(HASH, Point::new(3, 3), 30, 2);

        assert_eq!(tt.probe(HASH, 2), Some((Point::new(3, 3), 30)));
    }

    #[test]
    fn test_tt_no_replacement_farther_from_root() {
        let mut tt = TranspositionTable::new();
        tt.store(HASH, Point::new(1, 1), 10, 1);
        tt.store(HASH, Point::new(4, 4), 40, 3);

        let entry = tt.entry(HASH).unwrap();
        assert_eq!(entry.best_point, Point::new(1, 1));
        assert_eq!(entry.depth, 1);
    }

    #[test]
    fn test_tt_clear_and_stats() {
        let mut tt = TranspositionTable::new();
        tt.store(1, Point::new(0, 1), 0, 0);
        tt.store(2, Point::new(0, 2), 0, 2);
        tt.store(3, Point::new(0, 3), 0, 2);

        let stats = tt.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.by_depth[0], 1);
        assert_eq!(stats.by_depth[2], 2);

        tt.clear();
        assert!(tt.is_empty());
    }
}
