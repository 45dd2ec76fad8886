//! Win condition checking
//!
//! Six or more stones of one color in a row, orthogonally or diagonally.
//! There are no captures and no forbidden shapes.

use crate::board::{Board, Cell, Point, Stone, AXES};

/// Stones needed in a row to win
pub const WIN_LENGTH: usize = 6;

/// Contiguous `stone` cells from `point` along `dir`, not counting `point`.
#[inline]
pub fn run_from(board: &Board, point: Point, dir: (i32, i32), stone: Stone) -> usize {
    let mut len = 1;
    while board.cell_from(point, dir, len) == Cell::Stone(stone) {
        len += 1;
    }
    #[allow(clippy::cast_sign_loss)]
    let run = (len - 1) as usize;
    run
}

/// Length of the `stone` run through `point` along one axis, counting
/// `point` itself whatever it holds.
#[inline]
pub fn run_through(board: &Board, point: Point, (dx, dy): (i32, i32), stone: Stone) -> usize {
    1 + run_from(board, point, (dx, dy), stone) + run_from(board, point, (-dx, -dy), stone)
}

/// Fast six-in-a-row check at a specific point.
///
/// Only the 4 axes through `point` are scanned, so this is the check to use
/// right after a placement.
#[inline]
pub fn has_six_at(board: &Board, point: Point, stone: Stone) -> bool {
    AXES
        .iter()
        .any(|&axis| run_through(board, point, axis, stone) >= WIN_LENGTH)
}

/// Find the stones of a winning line for `stone`, if any.
///
/// Returns the full run (six or longer) in axis order.
pub fn find_six_positions(board: &Board, stone: Stone) -> Option<Vec<Point>> {
    let size = board.size();
    for start in board.points_of(stone) {
        for &(dx, dy) in &AXES {
            // Only start from the tail of a run
            if board.cell_from(start, (-dx, -dy), 1) == Cell::Stone(stone) {
                continue;
            }
            let len = 1 + run_from(board, start, (dx, dy), stone);
            if len >= WIN_LENGTH {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let line = (0..len as i32)
                    .filter_map(|i| start.offset((dx, dy), i, size))
                    .collect();
                return Some(line);
            }
        }
    }
    None
}

/// Check if there's a six in a row for the given color
pub fn has_six_in_row(board: &Board, stone: Stone) -> bool {
    find_six_positions(board, stone).is_some()
}

/// Winner of the position, if any. Black is reported first when, through
/// replayed history, both colors hold a row.
pub fn check_winner(board: &Board) -> Option<Stone> {
    [Stone::Black, Stone::White]
        .into_iter()
        .find(|&stone| has_six_in_row(board, stone))
}

/// Board filled without a winner
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::zobrist::ZobristTable;

    fn line(board: &mut Board, start: (u8, u8), dir: (i32, i32), n: i32, stone: Stone) {
        let origin = Point::new(start.0, start.1);
        for i in 0..n {
            let p = origin.offset(dir, i, board.size()).unwrap();
            board.place(p, stone).unwrap();
        }
    }

    fn empty() -> Board {
        Board::new(19, Arc::new(ZobristTable::new()))
    }

    #[test]
    fn test_six_in_row_horizontal() {
        let mut board = empty();
        line(&mut board, (3, 5), (1, 0), 6, Stone::Black);
        assert!(has_six_in_row(&board, Stone::Black));
        assert!(!has_six_in_row(&board, Stone::White));
        assert_eq!(check_winner(&board), Some(Stone::Black));
    }

    #[test]
    fn test_six_in_row_anti_diagonal() {
        let mut board = empty();
        line(&mut board, (12, 2), (-1, 1), 6, Stone::White);
        let found = find_six_positions(&board, Stone::White).unwrap();
        assert_eq!(found.len(), 6);
        assert!(has_six_at(&board, Point::new(9, 5), Stone::White));
    }

    #[test]
    fn test_five_not_win() {
        let mut board = empty();
        line(&mut board, (0, 0), (1, 1), 5, Stone::Black);
        assert!(!has_six_in_row(&board, Stone::Black));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_seven_also_wins() {
        let mut board = empty();
        line(&mut board, (2, 9), (0, 1), 7, Stone::White);
        assert_eq!(find_six_positions(&board, Stone::White).map(|l| l.len()), Some(7));
    }

    #[test]
    fn test_broken_line_not_win() {
        let mut board = empty();
        line(&mut board, (1, 1), (1, 0), 3, Stone::Black);
        line(&mut board, (5, 1), (1, 0), 3, Stone::Black);
        assert!(!has_six_in_row(&board, Stone::Black));

        // Filling the gap completes seven; the gap point sees it before placing
        assert!(has_six_at(&board, Point::new(4, 1), Stone::Black));
    }

    #[test]
    fn test_run_blocked_by_opponent() {
        let mut board = empty();
        line(&mut board, (4, 4), (0, 1), 5, Stone::Black);
        board.place(Point::new(4, 9), Stone::White).unwrap();
        assert_eq!(run_through(&board, Point::new(4, 3), (0, 1), Stone::Black), 6);
        assert_eq!(run_from(&board, Point::new(4, 3), (0, -1), Stone::Black), 0);
    }

    #[test]
    fn test_draw_needs_full_board() {
        let board = empty();
        assert!(!is_draw(&board));
    }
}
