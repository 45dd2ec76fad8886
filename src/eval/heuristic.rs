//! Heuristic evaluation of points and positions
//!
//! [`evaluate_point`] scores an empty point for move ordering: how much
//! either color would gain on the four axes through it. [`evaluate_board`]
//! scores every line a color already occupies, and
//! [`evaluate_differential`] is what the search maximises.

use crate::board::{Bitboard, Board, Cell, Point, Stone, AXES};
use crate::rules::reach::is_reachable;

use super::patterns::{
    board_end_factor, half_line_score, line_score, longest_run, point_end_factor, PatternScore,
    OPPONENT_WEIGHT, SCAN_RADIUS, UNREACHABLE_GAP,
};

/// Cells on one side of an origin that `color` could use.
struct HalfLine {
    /// Own stone flags, nearest first
    cells: Vec<bool>,
    points: Vec<Point>,
    /// Scan hit an opponent stone or the edge
    blocked: bool,
}

fn scan(board: &Board, origin: Point, dir: (i32, i32), color: Stone) -> HalfLine {
    let mut half = HalfLine {
        cells: Vec::with_capacity(SCAN_RADIUS as usize),
        points: Vec::with_capacity(SCAN_RADIUS as usize),
        blocked: false,
    };
    for len in 1..=SCAN_RADIUS {
        let own = match board.cell_from(origin, dir, len) {
            Cell::Empty => false,
            Cell::Stone(s) if s == color => true,
            _ => {
                half.blocked = true;
                break;
            }
        };
        // In range, since the cell was not OffBoard
        if let Some(p) = origin.offset(dir, len, board.size()) {
            half.cells.push(own);
            half.points.push(p);
        }
    }
    half
}

/// Empty cells among `points` that no knight move reaches
fn unreachable_gaps<'a>(board: &Board, points: impl Iterator<Item = &'a Point>) -> i32 {
    let count = points
        .filter(|&&p| board.is_empty(p) && !is_reachable(board, p))
        .count();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let count = count as i32;
    count
}

/// Value of `point` for one evaluated color.
fn evaluate_point_for(board: &Board, point: Point, mover: Stone, color: Stone) -> i32 {
    let mut result = 0.0;
    for &(dx, dy) in &AXES {
        let head = scan(board, point, (-dx, -dy), color);
        let tail = scan(board, point, (dx, dy), color);

        let span = head.cells.len() + tail.cells.len() + 1;
        let blanks = unreachable_gaps(board, head.points.iter().chain(tail.points.iter()));
        let factor = point_end_factor(head.blocked, tail.blocked, span)
            / UNREACHABLE_GAP.powi(blanks);

        result += half_line_score(&head.cells) * half_line_score(&tail.cells) * factor;
    }
    if color != mover {
        result *= OPPONENT_WEIGHT;
    }
    #[allow(clippy::cast_possible_truncation)]
    let score = result as i32;
    score
}

/// Move-ordering value of placing at `point` when `mover` is to play.
///
/// Sums the value for both colors, so blocking points rank alongside
/// building points; the side not moving is discounted.
#[must_use]
pub fn evaluate_point(board: &Board, point: Point, mover: Stone) -> i32 {
    evaluate_point_for(board, point, mover, Stone::Black)
        .saturating_add(evaluate_point_for(board, point, mover, Stone::White))
}

/// Static score of every line `side` occupies.
///
/// Stones are visited in ascending index order. Each axis keeps a set of
/// cells already covered by an earlier window, so a row is scored once no
/// matter how many of its stones sit in it.
#[must_use]
pub fn evaluate_board(board: &Board, side: Stone) -> i32 {
    let size = board.size();
    let mut result = 0.0;

    for &(dx, dy) in &AXES {
        let mut covered = Bitboard::new(size * size);
        for origin in board.points_of(side) {
            if covered.get(origin.to_index(size)) {
                continue;
            }
            let head = scan(board, origin, (-dx, -dy), side);
            let tail = scan(board, origin, (dx, dy), side);

            // Window in axis order: far head ... origin ... far tail
            let cells: Vec<bool> = head
                .cells
                .iter()
                .rev()
                .copied()
                .chain(std::iter::once(true))
                .chain(tail.cells.iter().copied())
                .collect();

            covered.set(origin.to_index(size));
            for p in head.points.iter().chain(tail.points.iter()) {
                covered.set(p.to_index(size));
            }

            let blanks = unreachable_gaps(board, head.points.iter().chain(tail.points.iter()));
            let factor = board_end_factor(head.blocked, tail.blocked, cells.len())
                / UNREACHABLE_GAP.powi(blanks);

            let mut score = line_score(&cells) * factor;
            if longest_run(&cells) >= 6 {
                score = score.max(f64::from(PatternScore::SIX));
            }
            result += score;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let score = result as i32;
    score
}

/// `evaluate_board(side) - evaluate_board(opponent)`; positive favours `side`.
#[must_use]
pub fn evaluate_differential(board: &Board, side: Stone) -> i32 {
    evaluate_board(board, side).saturating_sub(evaluate_board(board, side.opponent()))
}

/// Differential `value`, taken from the maximiser's side, has crossed the
/// victory threshold in favour of the maximiser (`maximizing`) or of the
/// minimiser.
#[inline]
pub fn is_decisive(value: i32, maximizing: bool) -> bool {
    if maximizing {
        value > PatternScore::VICTORY_STANDARD
    } else {
        value < -PatternScore::VICTORY_STANDARD
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::zobrist::ZobristTable;

    fn board_with(size: usize, stones: &[((u8, u8), Stone)]) -> Board {
        let mut board = Board::new(size, Arc::new(ZobristTable::new()));
        for &((x, y), s) in stones {
            board.place(Point::new(x, y), s).unwrap();
        }
        board
    }

    fn row(x0: u8, y: u8, n: u8, stone: Stone) -> Vec<((u8, u8), Stone)> {
        (0..n).map(|i| ((x0 + i, y), stone)).collect()
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = board_with(19, &[]);
        assert_eq!(evaluate_board(&board, Stone::Black), 0);
        assert_eq!(evaluate_differential(&board, Stone::White), 0);
    }

    #[test]
    fn test_differential_antisymmetric() {
        let board = board_with(
            19,
            &[
                ((9, 9), Stone::Black),
                ((11, 10), Stone::White),
                ((7, 8), Stone::Black),
            ],
        );
        assert_eq!(
            evaluate_differential(&board, Stone::Black),
            -evaluate_differential(&board, Stone::White)
        );
        assert!(evaluate_differential(&board, Stone::Black) > 0);
    }

    #[test]
    fn test_six_crosses_victory() {
        let mut stones = row(5, 9, 6, Stone::Black);
        // Cap both ends; the floor still applies
        stones.push(((4, 9), Stone::White));
        stones.push(((11, 9), Stone::White));
        let board = board_with(19, &stones);

        let diff = evaluate_differential(&board, Stone::Black);
        assert!(diff > PatternScore::VICTORY_STANDARD, "diff = {diff}");
        assert!(is_decisive(diff, true));
        assert!(!is_decisive(diff, false));

        // Seen from White the same board is lost
        let white = evaluate_differential(&board, Stone::White);
        assert!(is_decisive(white, false));
        assert!(!is_decisive(white, true));
    }

    #[test]
    fn test_five_does_not_cross_victory() {
        let board = board_with(19, &row(5, 9, 5, Stone::Black));
        let diff = evaluate_differential(&board, Stone::Black);
        assert!(diff > 0);
        assert!(diff < PatternScore::VICTORY_STANDARD, "diff = {diff}");
    }

    #[test]
    fn test_longer_row_scores_higher() {
        let three = board_with(19, &row(5, 9, 3, Stone::Black));
        let four = board_with(19, &row(5, 9, 4, Stone::Black));
        assert!(evaluate_board(&four, Stone::Black) > evaluate_board(&three, Stone::Black));
    }

    #[test]
    fn test_blocked_row_scores_lower() {
        let open = board_with(19, &row(5, 9, 3, Stone::Black));
        let mut stones = row(5, 9, 3, Stone::Black);
        stones.push(((8, 9), Stone::White));
        let blocked = board_with(19, &stones);
        assert!(evaluate_board(&blocked, Stone::Black) < evaluate_board(&open, Stone::Black));
    }

    #[test]
    fn test_point_extending_row_ranks_higher() {
        let board = board_with(19, &row(5, 9, 4, Stone::Black));
        let extend = evaluate_point(&board, Point::new(9, 9), Stone::Black);
        let far = evaluate_point(&board, Point::new(15, 2), Stone::Black);
        assert!(extend > far);
    }

    #[test]
    fn test_point_mover_weight() {
        // Only White stones nearby: White to move values the point more
        let board = board_with(19, &row(5, 9, 3, Stone::White));
        let p = Point::new(8, 9);
        assert!(evaluate_point(&board, p, Stone::White) > evaluate_point(&board, p, Stone::Black));
    }

    #[test]
    fn test_board_score_independent_of_move_order() {
        let a = board_with(
            19,
            &[((9, 9), Stone::Black), ((11, 10), Stone::White), ((13, 11), Stone::Black)],
        );
        let b = board_with(
            19,
            &[((13, 11), Stone::Black), ((11, 10), Stone::White), ((9, 9), Stone::Black)],
        );
        assert_eq!(evaluate_board(&a, Stone::Black), evaluate_board(&b, Stone::Black));
    }
}
