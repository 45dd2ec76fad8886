//! Board representation for Knight Gobang 6

pub mod bitboard;
pub mod board;
pub mod position;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;
pub use position::Position;

/// Largest supported board edge (hard difficulty)
pub const MAX_BOARD_SIZE: usize = 49;

/// Knight-move offsets. A stone may only land on a point reachable from an
/// existing stone through one of these.
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// All 8 unit steps, used for "touches a stone" checks
pub const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// The 4 canonical axes. Each is scanned both ways from the origin point.
pub const AXES: [(i32, i32); 4] = [
    (1, 0),  // Right
    (1, 1),  // Up-right
    (0, 1),  // Up
    (-1, 1), // Up-left
];

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Zobrist slot for this color
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Stone::Black => 0,
            Stone::White => 1,
        }
    }
}

/// Content of a cell as seen by scanning code.
///
/// Reads outside the board return `OffBoard` instead of failing so that line
/// scans can treat edges like any other blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Stone(Stone),
    OffBoard,
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, Cell::Stone(_))
    }
}

/// Zero-based point on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!((x as usize) < MAX_BOARD_SIZE && (y as usize) < MAX_BOARD_SIZE);
        Self { x, y }
    }

    /// Build a point from signed coordinates, `None` when outside `[0, size)`.
    #[inline]
    pub fn checked(x: i32, y: i32, size: usize) -> Option<Self> {
        if in_range(x, y, size) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    /// Step `len` times along `(dx, dy)`, `None` once off the board.
    #[inline]
    pub fn offset(self, (dx, dy): (i32, i32), len: i32, size: usize) -> Option<Self> {
        Self::checked(
            i32::from(self.x) + dx * len,
            i32::from(self.y) + dy * len,
            size,
        )
    }

    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.x as usize * size + self.y as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            x: (idx / size) as u8,
            y: (idx % size) as u8,
        }
    }

    /// One-based display coordinates
    #[inline]
    pub fn to_position(self) -> (u16, u16) {
        (u16::from(self.x) + 1, u16::from(self.y) + 1)
    }

    /// Inverse of [`Point::to_position`]
    #[inline]
    pub fn from_position(x: u16, y: u16) -> Option<Self> {
        let (x, y) = (i32::from(x) - 1, i32::from(y) - 1);
        Self::checked(x, y, MAX_BOARD_SIZE)
    }

    /// Chebyshev distance to the board centre
    #[inline]
    pub fn center_distance(self, size: usize) -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let mid = (size / 2) as i32;
        (i32::from(self.x) - mid)
            .abs()
            .max((i32::from(self.y) - mid).abs())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Check signed coordinates against a board edge length
#[inline]
pub fn in_range(x: i32, y: i32, size: usize) -> bool {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let n = size as i32;
    x >= 0 && x < n && y >= 0 && y < n
}

/// A real stone placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub point: Point,
    pub stone: Stone,
}

impl Move {
    #[inline]
    pub fn new(point: Point, stone: Stone) -> Self {
        Self { point, stone }
    }
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Resign(Stone),
    Abend,
    Win(Stone),
    Draw,
}

/// One record of the shared match history kept by the turn manager.
///
/// The engine only cares whether an entry adds a stone, takes one back, or
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    Stone(Move),
    Retraction,
    Reretraction,
    Outcome(GameOutcome),
}
