//! Zobrist hashing for position identification
//!
//! Zobrist hashing allows O(1) incremental hash updates when placing/removing stones.
//! This is essential for efficient transposition table lookups during search.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use knight6::board::{Point, Stone};
//! use knight6::search::{Fingerprint, ZobristTable};
//!
//! let mut fp = Fingerprint::new(Arc::new(ZobristTable::new()));
//! let before = fp.value();
//!
//! fp.toggle(Point::new(9, 9), Stone::Black);
//! assert_ne!(fp.value(), before);
//!
//! // XOR is self-inverse: removing the same stone restores the hash
//! fp.toggle(Point::new(9, 9), Stone::Black);
//! assert_eq!(fp.value(), before);
//! ```

use std::sync::Arc;

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Point, Stone, MAX_BOARD_SIZE};

/// Fixed seed so every engine instance (and every test run) agrees on keys
const ZOBRIST_SEED: u64 = 202_174_362_880;

/// Zobrist hash table for position hashing.
///
/// Keys are laid out for the largest board and indexed by `(x, y)` directly,
/// so one table serves every board size.
pub struct ZobristTable {
    /// `[x * MAX_BOARD_SIZE + y][color]`
    keys: Vec<[u64; 2]>,
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);
        let keys = (0..MAX_BOARD_SIZE * MAX_BOARD_SIZE)
            .map(|_| [rng.next_u64(), rng.next_u64()])
            .collect();
        Self { keys }
    }

    /// Key for a stone of `stone` at `point`
    #[inline]
    #[must_use]
    pub fn key(&self, point: Point, stone: Stone) -> u64 {
        self.keys[point.to_index(MAX_BOARD_SIZE)][stone.index()]
    }

    /// Compute the full hash for a board position.
    ///
    /// This iterates over all stones on the board. During search the board
    /// keeps its [`Fingerprint`] up to date incrementally instead.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for stone in [Stone::Black, Stone::White] {
            for point in board.points_of(stone) {
                h ^= self.key(point, stone);
            }
        }
        h
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Running hash of one board.
#[derive(Clone)]
pub struct Fingerprint {
    table: Arc<ZobristTable>,
    value: u64,
}

impl Fingerprint {
    /// Fingerprint of the empty board
    pub fn new(table: Arc<ZobristTable>) -> Self {
        Self { table, value: 0 }
    }

    /// XOR the key for `(point, stone)` in or out.
    ///
    /// Called once when the stone is placed and once when it is removed.
    #[inline]
    pub fn toggle(&mut self, point: Point, stone: Stone) {
        self.value ^= self.table.key(point, stone);
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Table backing this fingerprint
    #[inline]
    pub fn table(&self) -> &Arc<ZobristTable> {
        &self.table
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({:#018x})", self.value)
    }
}
