//! Knight-adjacency legality
//!
//! After the opening stone, a point is playable only if a knight's move away
//! from some stone of either color. Committed and trial moves share
//! [`check_move`].

use crate::board::{Bitboard, Board, Point, KNIGHT_OFFSETS};
use crate::error::{EngineError, IllegalReason, Result};

/// Any knight neighbour occupied, or the board still empty.
#[inline]
pub fn is_reachable(board: &Board, point: Point) -> bool {
    board.is_board_empty()
        || KNIGHT_OFFSETS
            .iter()
            .any(|&dir| board.cell_from(point, dir, 1).is_stone())
}

/// Every playable point, ascending by index.
///
/// Recomputed from the stones on the board each call, so trial stones count.
pub fn legal_candidates(board: &Board) -> Vec<Point> {
    let size = board.size();
    if board.is_board_empty() {
        return (0..size * size)
            .map(|idx| Point::from_index(idx, size))
            .collect();
    }

    let mut marks = Bitboard::new(size * size);
    for stone in board.occupied() {
        for &dir in &KNIGHT_OFFSETS {
            if let Some(target) = stone.offset(dir, 1, size) {
                if board.is_empty(target) {
                    marks.set(target.to_index(size));
                }
            }
        }
    }
    marks
        .iter_ones()
        .map(|idx| Point::from_index(idx, size))
        .collect()
}

/// Legality predicate for both real and trial moves.
pub fn check_move(board: &Board, point: Point) -> Result<()> {
    if !board.contains(point) {
        return Err(EngineError::illegal(point, IllegalReason::OutOfRange));
    }
    if !board.is_empty(point) {
        return Err(EngineError::illegal(point, IllegalReason::Occupied));
    }
    if !is_reachable(board, point) {
        return Err(EngineError::illegal(point, IllegalReason::Unreachable));
    }
    Ok(())
}
