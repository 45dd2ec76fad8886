//! Board structure with an incrementally maintained fingerprint

use std::sync::Arc;

use super::bitboard::Bitboard;
use super::{in_range, Cell, Point, Stone};
use crate::error::{EngineError, IllegalReason, Result};
use crate::search::zobrist::{Fingerprint, ZobristTable};

/// Game board of `size x size` cells.
///
/// Every placement and removal goes through [`Board::place`] and
/// [`Board::remove`], which toggle the fingerprint in the same call, so the
/// hash always matches the stones on the board.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Stone>>,
    /// Black stones bitboard
    black: Bitboard,
    /// White stones bitboard
    white: Bitboard,
    fingerprint: Fingerprint,
}

impl Board {
    pub fn new(size: usize, zobrist: Arc<ZobristTable>) -> Self {
        let cells = size * size;
        Self {
            size,
            cells: vec![None; cells],
            black: Bitboard::new(cells),
            white: Bitboard::new(cells),
            fingerprint: Fingerprint::new(zobrist),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether signed coordinates fall on the board
    #[inline]
    pub fn in_range(&self, x: i32, y: i32) -> bool {
        in_range(x, y, self.size)
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        (point.x as usize) < self.size && (point.y as usize) < self.size
    }

    /// Cell at signed coordinates; `OffBoard` outside the grid
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if !self.in_range(x, y) {
            return Cell::OffBoard;
        }
        #[allow(clippy::cast_sign_loss)]
        let idx = x as usize * self.size + y as usize;
        match self.cells[idx] {
            Some(stone) => Cell::Stone(stone),
            None => Cell::Empty,
        }
    }

    /// Get cell at point
    #[inline]
    pub fn get(&self, point: Point) -> Cell {
        self.cell(i32::from(point.x), i32::from(point.y))
    }

    /// Cell `len` steps from `point` along `dir`
    #[inline]
    pub fn cell_from(&self, point: Point, (dx, dy): (i32, i32), len: i32) -> Cell {
        self.cell(i32::from(point.x) + dx * len, i32::from(point.y) + dy * len)
    }

    /// Color at point, the name scanners use
    #[inline]
    pub fn color_at(&self, point: Point) -> Cell {
        self.get(point)
    }

    /// Check if position is on the board and empty
    #[inline]
    pub fn is_empty(&self, point: Point) -> bool {
        self.get(point) == Cell::Empty
    }

    /// Place a stone and hash it in.
    pub fn place(&mut self, point: Point, stone: Stone) -> Result<()> {
        if !self.contains(point) {
            return Err(EngineError::illegal(point, IllegalReason::OutOfRange));
        }
        let idx = point.to_index(self.size);
        if self.cells[idx].is_some() {
            return Err(EngineError::illegal(point, IllegalReason::Occupied));
        }
        self.cells[idx] = Some(stone);
        self.stones_mut(stone).set(idx);
        self.fingerprint.toggle(point, stone);
        Ok(())
    }

    /// Remove a stone and hash it out, returning its color.
    pub fn remove(&mut self, point: Point) -> Result<Stone> {
        if !self.contains(point) {
            return Err(EngineError::illegal(point, IllegalReason::OutOfRange));
        }
        let idx = point.to_index(self.size);
        let Some(stone) = self.cells[idx].take() else {
            return Err(EngineError::illegal(point, IllegalReason::Vacant));
        };
        self.stones_mut(stone).clear(idx);
        self.fingerprint.toggle(point, stone);
        Ok(stone)
    }

    /// Current 64-bit position fingerprint
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint.value()
    }

    /// Key table shared with every other board of this engine
    #[inline]
    pub fn zobrist(&self) -> &Arc<ZobristTable> {
        self.fingerprint.table()
    }

    /// Get bitboard for a color
    #[inline]
    pub fn stones(&self, stone: Stone) -> &Bitboard {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    #[inline]
    fn stones_mut(&mut self, stone: Stone) -> &mut Bitboard {
        match stone {
            Stone::Black => &mut self.black,
            Stone::White => &mut self.white,
        }
    }

    /// Points holding `stone`, in ascending index order
    pub fn points_of(&self, stone: Stone) -> impl Iterator<Item = Point> + '_ {
        let size = self.size;
        self.stones(stone)
            .iter_ones()
            .map(move |idx| Point::from_index(idx, size))
    }

    /// Every occupied point, in ascending index order
    pub fn occupied(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(move |(idx, _)| Point::from_index(idx, size))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// Every cell holds a stone
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == self.size * self.size
    }

    /// Centre point, where the opening stone goes
    #[inline]
    pub fn center(&self) -> Point {
        #[allow(clippy::cast_possible_truncation)]
        let mid = (self.size / 2) as u8;
        Point::new(mid, mid)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl Eq for Board {}
