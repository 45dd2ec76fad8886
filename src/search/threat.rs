//! Threat detection for the tactical search phase
//!
//! Finds the points a search must look at first:
//! - Forced-win points, where one stone completes six in a row
//! - Double-threat points, where one stone builds two near-wins at once
//!
//! These are the root candidates of the tactical phase.

use rustc_hash::FxHashMap;

use crate::board::{Bitboard, Board, Cell, Point, Stone, AXES, DIRECTIONS};
use crate::rules::reach::is_reachable;
use crate::rules::win::{run_from, WIN_LENGTH};

/// Farthest cell looked at on each side of a candidate
const THREAT_REACH: i32 = 5;

/// Urgency of the engine's own winning point
pub const OWN_WIN_URGENCY: i32 = 12;
/// Urgency of the opponent's winning point
pub const OPPONENT_WIN_URGENCY: i32 = 11;

/// Axis strength when the candidate makes five (one short of six)
const NEAR_WIN: i32 = 5;
/// Axis strength for an open four
const OPEN_FOUR: i32 = 3;
/// Summed strength that makes a point a double threat
const DOUBLE_THREAT: i32 = 6;

/// A point with an ordering urgency; higher is more pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatPoint {
    pub point: Point,
    pub urgency: i32,
}

impl ThreatPoint {
    #[inline]
    pub fn new(point: Point, urgency: i32) -> Self {
        Self { point, urgency }
    }
}

/// Empty points within `radius` straight steps of any stone, ascending.
fn empty_points_near(board: &Board, stones: impl Iterator<Item = Point>, radius: i32) -> Vec<Point> {
    let size = board.size();
    let mut marks = Bitboard::new(size * size);
    for stone in stones {
        for &dir in &DIRECTIONS {
            for len in 1..=radius {
                if let Some(p) = stone.offset(dir, len, size) {
                    if board.is_empty(p) {
                        marks.set(p.to_index(size));
                    }
                }
            }
        }
    }
    marks
        .iter_ones()
        .map(|idx| Point::from_index(idx, size))
        .collect()
}

/// Own stones contiguous from `point` toward `dir`, capped at the reach
#[inline]
fn capped_run(board: &Board, point: Point, dir: (i32, i32), side: Stone) -> i32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let run = run_from(board, point, dir, side) as i32;
    run.min(THREAT_REACH)
}

/// Empty points where `side` completes six or more in a row.
///
/// Deduplicated, ascending by index.
pub fn forced_win_points(board: &Board, side: Stone) -> Vec<Point> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let needed = WIN_LENGTH as i32 - 1;
    empty_points_near(board, board.points_of(side), 1)
        .into_iter()
        .filter(|&p| {
            AXES.iter().any(|&(dx, dy)| {
                capped_run(board, p, (dx, dy), side) + capped_run(board, p, (-dx, -dy), side)
                    >= needed
            })
        })
        .collect()
}

/// One side of a candidate along an axis.
#[derive(Debug, Clone, Copy)]
struct Wing {
    /// Own stones touching the candidate
    run: i32,
    /// Own stones past a single empty cell after `run`, zero if none
    beyond_gap: i32,
}

impl Wing {
    fn scan(board: &Board, point: Point, dir: (i32, i32), side: Stone) -> Self {
        let run = capped_run(board, point, dir, side);
        let mut beyond_gap = 0;
        if run + 1 < THREAT_REACH && board.cell_from(point, dir, run + 1) == Cell::Empty {
            let mut len = run + 2;
            while len <= THREAT_REACH && board.cell_from(point, dir, len) == Cell::Stone(side) {
                beyond_gap += 1;
                len += 1;
            }
        }
        Self { run, beyond_gap }
    }

    /// Cells spanned when the gap is used
    fn gapped_extent(self) -> i32 {
        self.run + 1 + self.beyond_gap
    }
}

/// Strength of one axis through `point` for `side`.
///
/// At most one gap is allowed across the whole span. Five or more own stones
/// counting the candidate score [`NEAR_WIN`]; exactly four with empty cells
/// just outside both ends score [`OPEN_FOUR`].
fn axis_strength(board: &Board, point: Point, (dx, dy): (i32, i32), side: Stone) -> i32 {
    let head = Wing::scan(board, point, (-dx, -dy), side);
    let tail = Wing::scan(board, point, (dx, dy), side);

    // (stones, head extent, tail extent) for each way of spending the gap
    let mut shapes = vec![(1 + head.run + tail.run, head.run, tail.run)];
    if head.beyond_gap > 0 {
        shapes.push((
            1 + head.run + head.beyond_gap + tail.run,
            head.gapped_extent(),
            tail.run,
        ));
    }
    if tail.beyond_gap > 0 {
        shapes.push((
            1 + head.run + tail.run + tail.beyond_gap,
            head.run,
            tail.gapped_extent(),
        ));
    }

    if shapes.iter().any(|&(stones, _, _)| stones >= 5) {
        return NEAR_WIN;
    }
    let open_four = shapes.iter().any(|&(stones, h, t)| {
        stones == 4
            && board.cell_from(point, (-dx, -dy), h + 1) == Cell::Empty
            && board.cell_from(point, (dx, dy), t + 1) == Cell::Empty
    });
    if open_four {
        OPEN_FOUR
    } else {
        0
    }
}

/// Points where one `side` stone builds two threats at once.
///
/// Urgency is the summed axis strength, one less when `side` is not the
/// engine's side so that own threats order first.
pub fn double_threat_points(board: &Board, side: Stone, engine_side: Stone) -> Vec<ThreatPoint> {
    let penalty = i32::from(side != engine_side);
    empty_points_near(board, board.occupied(), 2)
        .into_iter()
        .filter_map(|p| {
            let strength: i32 = AXES
                .iter()
                .map(|&axis| axis_strength(board, p, axis, side))
                .sum();
            (strength >= DOUBLE_THREAT).then(|| ThreatPoint::new(p, strength - penalty))
        })
        .collect()
}

/// Some six-cell window holds five `side` stones and one empty cell.
pub fn has_five_in_open_line(board: &Board, side: Stone) -> bool {
    let size = board.size();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let window = WIN_LENGTH as i32;
    board.points_of(side).any(|stone| {
        AXES.iter().any(|&axis| {
            (1 - window..=0).any(|start| {
                let mut own = 0;
                let mut empty = 0;
                for i in start..start + window {
                    match stone.offset(axis, i, size).map(|p| board.get(p)) {
                        Some(Cell::Stone(s)) if s == side => own += 1,
                        Some(Cell::Empty) => empty += 1,
                        _ => return false,
                    }
                }
                own == 5 && empty == 1
            })
        })
    })
}

/// Root candidates for the tactical phase.
///
/// Forced-win points of both sides and double-threat points of both sides,
/// restricted to legal points. A point found more than once keeps its
/// highest urgency. Sorted by urgency, then index.
pub fn priority_candidates(board: &Board, engine_side: Stone) -> Vec<ThreatPoint> {
    let opponent = engine_side.opponent();
    let mut best: FxHashMap<Point, i32> = FxHashMap::default();
    let mut note = |p: Point, urgency: i32| {
        best.entry(p)
            .and_modify(|u| *u = (*u).max(urgency))
            .or_insert(urgency);
    };

    for p in forced_win_points(board, engine_side) {
        note(p, OWN_WIN_URGENCY);
    }
    for p in forced_win_points(board, opponent) {
        note(p, OPPONENT_WIN_URGENCY);
    }
    for side in [engine_side, opponent] {
        for tp in double_threat_points(board, side, engine_side) {
            note(tp.point, tp.urgency);
        }
    }

    let size = board.size();
    let mut out: Vec<ThreatPoint> = best
        .into_iter()
        .filter(|&(p, _)| is_reachable(board, p))
        .map(|(p, urgency)| ThreatPoint::new(p, urgency))
        .collect();
    out.sort_by(|a, b| {
        b.urgency
            .cmp(&a.urgency)
            .then_with(|| a.point.to_index(size).cmp(&b.point.to_index(size)))
    });
    out
}
