//! Line scoring model for Knight Gobang 6 evaluation
//!
//! A line is the run of cells along one axis that a color could still use:
//! its own stones and empty cells, stopping at an opponent stone or the edge.
//! Scores are multiplicative. Each own stone multiplies by ten, so a line's
//! magnitude is roughly `10^stones`, and gaps and blocked ends shave it down.

/// Score thresholds shared by the evaluator and the search
pub struct PatternScore;

impl PatternScore {
    /// Differential beyond which a position counts as won
    pub const VICTORY_STANDARD: i32 = 800_000;
    /// Floor for any window holding six own stones in a row
    pub const SIX: i32 = 2_000_000;
}

/// Cells scanned on each side of the origin
pub const SCAN_RADIUS: i32 = 6;

/// Each own stone
const STONE: f64 = 10.0;
/// Own stones past the sixth in one window
const STONE_OVERFLOW: f64 = 1.06;
/// Gap inside the stones, following an empty cell (divisor)
const GAP_AFTER_EMPTY: f64 = 1.25;
/// Gap inside the stones, following a stone (divisor)
const GAP_AFTER_STONE: f64 = 1.12;
/// Room outside the stones, following an empty cell
const ROOM_AFTER_EMPTY: f64 = 1.06;
/// Room outside the stones, following a stone
const ROOM_AFTER_STONE: f64 = 1.12;
/// Empty cell that no knight move reaches yet (divisor)
pub const UNREACHABLE_GAP: f64 = 1.25;
/// Weight of the side that is not moving in a point evaluation
pub const OPPONENT_WEIGHT: f64 = 0.83;

/// Score one half-line, ordered from the origin outward.
///
/// `true` is an own stone, `false` an empty cell.
pub fn half_line_score(cells: &[bool]) -> f64 {
    let Some(edge) = cells.iter().rposition(|&own| own) else {
        return ROOM_AFTER_EMPTY.powi(cells.len() as i32);
    };

    let mut result = 1.0;
    let mut prev_own = false;
    for (i, &own) in cells.iter().enumerate() {
        result = if own {
            result * STONE
        } else if i < edge {
            result / if prev_own { GAP_AFTER_STONE } else { GAP_AFTER_EMPTY }
        } else {
            result * if prev_own { ROOM_AFTER_STONE } else { ROOM_AFTER_EMPTY }
        };
        prev_own = own;
    }
    result
}

/// Score a full window around a stone.
///
/// Empties between the first and last own stone are gaps; empties outside
/// them are room to grow.
pub fn line_score(cells: &[bool]) -> f64 {
    let (Some(first), Some(last)) = (
        cells.iter().position(|&own| own),
        cells.iter().rposition(|&own| own),
    ) else {
        return ROOM_AFTER_EMPTY.powi(cells.len() as i32);
    };

    let mut result = 1.0;
    let mut prev_own = false;
    let mut stones = 0;
    for (i, &own) in cells.iter().enumerate() {
        result = if own {
            stones += 1;
            result * if stones <= 6 { STONE } else { STONE_OVERFLOW }
        } else if i > first && i < last {
            result / if prev_own { GAP_AFTER_STONE } else { GAP_AFTER_EMPTY }
        } else {
            result * if prev_own { ROOM_AFTER_STONE } else { ROOM_AFTER_EMPTY }
        };
        prev_own = own;
    }
    result
}

/// End factor for a point evaluation.
///
/// `span` counts the usable cells including the origin. A line shut at both
/// ends that cannot hold six is worthless.
pub fn point_end_factor(head_blocked: bool, tail_blocked: bool, span: usize) -> f64 {
    match (head_blocked, tail_blocked) {
        (true, true) if span < 6 => 0.0,
        (true, true) => 1.0 / 1.57,
        (true, false) | (false, true) => 1.0 / 1.25,
        (false, false) => 1.0,
    }
}

/// End factor for a board window.
pub fn board_end_factor(head_blocked: bool, tail_blocked: bool, span: usize) -> f64 {
    match (head_blocked, tail_blocked) {
        (true, true) if span < 6 => 0.01 * 0.01,
        (true, true) => 0.01,
        (true, false) | (false, true) => 0.1,
        (false, false) => 1.0,
    }
}

/// Longest streak of own stones
pub fn longest_run(cells: &[bool]) -> usize {
    cells
        .split(|&own| !own)
        .map(<[bool]>::len)
        .max()
        .unwrap_or(0)
}
