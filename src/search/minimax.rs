//! Two-phase, beam-limited minimax with a single pruning bound
//!
//! Each turn runs two searches over the same position:
//!
//! - **Tactical**: the root only considers threat points (wins, blocks and
//!   double threats) and searches them deeper.
//! - **General**: the root considers every legal point at a shallower depth.
//!
//! Below the root both phases expand every legal point, ordered by
//! [`evaluate_point`] and cut to a beam. A node passes its running best to
//! each child as the child's bound; a maximising child stops as soon as it
//! beats that bound, a minimising child as soon as it drops below it.
//!
//! The tactical root sees fewer candidates than the nodes below it, so its
//! result never enters the tactical table.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use knight6::board::{Move, Point, Position, Stone};
//! use knight6::controller::CancelToken;
//! use knight6::search::{Searcher, ZobristTable};
//!
//! let mut position = Position::new(19, Arc::new(ZobristTable::new()));
//! position.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();
//! position.commit(Move::new(Point::new(11, 10), Stone::White)).unwrap();
//!
//! let mut searcher = Searcher::new(3, 2, 6);
//! let result = searcher
//!     .search(&mut position, Stone::Black, &CancelToken::new())
//!     .unwrap()
//!     .unwrap();
//! assert!(position.board().is_empty(result.best_point));
//! ```

use tracing::{debug, warn};

use crate::board::{Point, Position, Stone};
use crate::controller::CancelToken;
use crate::eval::{evaluate_differential, evaluate_point, is_decisive};
use crate::rules::reach::{check_move, legal_candidates};

use super::threat::{has_five_in_open_line, priority_candidates};
use super::tt::{TTStats, TranspositionTable};

/// Which root candidate policy a search ran with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Threat points only
    Tactical,
    /// Every legal point
    General,
}

/// The search noticed the cancellation token and stopped.
///
/// Trial stones may still be on the board; the caller unwinds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered
    pub nodes: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// Probes that returned a usable entry
    pub tt_hits: u64,
    /// Nodes that returned early on their bound
    pub cutoffs: u64,
    /// Nodes that returned on a placement crossing the victory threshold
    pub early_wins: u64,
    /// Cached points that were no longer legal
    pub inconsistencies: u64,
}

impl SearchStats {
    /// TT hit rate in percent
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }

    fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.tt_probes += other.tt_probes;
        self.tt_hits += other.tt_hits;
        self.cutoffs += other.cutoffs;
        self.early_wins += other.early_wins;
        self.inconsistencies += other.inconsistencies;
    }
}

/// Outcome of one search phase, or of the arbitration between both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Move for the engine's side
    pub best_point: Point,
    /// Value from the engine's side; above the victory standard is a win
    pub value: i32,
    /// Phase that produced `best_point`
    pub phase: Phase,
    /// Plies searched by that phase
    pub depth: u8,
    /// Counters across every phase that ran
    pub stats: SearchStats,
}

/// Value and point a node settled on
#[derive(Debug, Clone, Copy)]
struct Scored {
    point: Point,
    value: i32,
}

type NodeResult = Result<Option<Scored>, Cancelled>;

/// Whether `value` at `point` replaces `best`; ties go to the point nearer
/// the centre.
#[inline]
fn improves(maximizing: bool, value: i32, point: Point, best: Option<Scored>, size: usize) -> bool {
    let Some(best) = best else { return true };
    let better = if maximizing {
        value > best.value
    } else {
        value < best.value
    };
    better || (value == best.value && point.center_distance(size) < best.point.center_distance(size))
}

/// Number of ordered candidates a node tries out of `total`
#[inline]
pub fn beam_width(max_width: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (total / 5).max(max_width.min(total)).clamp(1, total)
}

/// One walk of the tree for a single phase.
struct Walk<'a> {
    position: &'a mut Position,
    table: &'a mut TranspositionTable,
    token: &'a CancelToken,
    stats: SearchStats,
    engine_side: Stone,
    max_width: usize,
    total_depth: u8,
    root_candidates: Vec<Point>,
    /// False when the root expands a narrower candidate set than the nodes
    /// below it; its result then stays out of the table.
    cache_root: bool,
}

impl Walk<'_> {
    /// Side to move `depth` plies below the root
    #[inline]
    fn mover(&self, depth: u8) -> Stone {
        if depth % 2 == 0 {
            self.engine_side
        } else {
            self.engine_side.opponent()
        }
    }

    /// Differential from the engine's side
    #[inline]
    fn static_value(&self) -> i32 {
        evaluate_differential(self.position.board(), self.engine_side)
    }

    /// Candidates best-first for `mover`
    fn ordered(&self, candidates: Vec<Point>, mover: Stone) -> Vec<Point> {
        let board = self.position.board();
        let size = board.size();
        let mut scored: Vec<(Point, i32)> = candidates
            .into_iter()
            .map(|p| (p, evaluate_point(board, p, mover)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.center_distance(size).cmp(&b.0.center_distance(size)))
                .then_with(|| a.0.to_index(size).cmp(&b.0.to_index(size)))
        });
        scored.into_iter().map(|(p, _)| p).collect()
    }

    #[inline]
    fn cacheable(&self, depth: u8) -> bool {
        depth > 0 || self.cache_root
    }

    fn probe(&mut self, hash: u64, depth: u8) -> Option<Scored> {
        if !self.cacheable(depth) {
            return None;
        }
        self.stats.tt_probes += 1;
        let (point, value) = self.table.probe(hash, depth)?;
        if check_move(self.position.board(), point).is_err() {
            self.stats.inconsistencies += 1;
            warn!(%point, hash, depth, "cached point is not legal here, ignoring entry");
            return None;
        }
        self.stats.tt_hits += 1;
        Some(Scored { point, value })
    }

    fn store(&mut self, hash: u64, scored: Scored, depth: u8) -> Scored {
        if self.cacheable(depth) {
            self.table.store(hash, scored.point, scored.value, depth);
        }
        scored
    }

    /// Search the node `depth` plies below the root.
    ///
    /// `bound` is the parent's running best. Returns `Ok(None)` when the
    /// node has nothing to play.
    fn node(&mut self, depth: u8, bound: i32) -> NodeResult {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        self.stats.nodes += 1;

        let hash = self.position.board().fingerprint();
        if let Some(hit) = self.probe(hash, depth) {
            return Ok(Some(hit));
        }

        let mover = self.mover(depth);
        let maximizing = mover == self.engine_side;
        let candidates = if depth == 0 {
            std::mem::take(&mut self.root_candidates)
        } else {
            legal_candidates(self.position.board())
        };
        let ordered = self.ordered(candidates, mover);
        let Some(&top) = ordered.first() else {
            return Ok(None);
        };

        let left = self.total_depth - depth;
        if left <= 1 {
            if let Err(err) = self.position.push_trial(top, mover) {
                warn!(%err, "leaf candidate rejected");
                return Ok(None);
            }
            let value = self.static_value();
            self.position.pop_trial();
            return Ok(Some(self.store(hash, Scored { point: top, value }, depth)));
        }

        let size = self.position.board().size();
        let width = beam_width(self.max_width, ordered.len());
        let mut best: Option<Scored> = None;

        for &point in ordered.iter().take(width) {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            if let Err(err) = self.position.push_trial(point, mover) {
                warn!(%err, "candidate rejected");
                continue;
            }

            let static_value = self.static_value();
            if is_decisive(static_value, maximizing) {
                self.position.pop_trial();
                self.stats.early_wins += 1;
                let won = Scored {
                    point,
                    value: static_value,
                };
                return Ok(Some(self.store(hash, won, depth)));
            }

            let running = best.map_or(if maximizing { i32::MIN } else { i32::MAX }, |b| b.value);
            let child = self.node(depth + 1, running)?;
            self.position.pop_trial();
            let value = child.map_or(static_value, |c| c.value);

            let cut = if maximizing {
                value >= bound
            } else {
                value <= bound
            };
            if cut {
                self.stats.cutoffs += 1;
                return Ok(Some(Scored { point, value }));
            }

            if improves(maximizing, value, point, best, size) {
                best = Some(Scored { point, value });
            }
        }

        Ok(best.map(|b| self.store(hash, b, depth)))
    }
}

/// Search engine holding one transposition table per phase.
///
/// Tables persist across turns so repeated searches of a position agree.
#[derive(Debug)]
pub struct Searcher {
    tactical: TranspositionTable,
    general: TranspositionTable,
    priority_depth: u8,
    general_depth: u8,
    max_width: usize,
}

impl Searcher {
    #[must_use]
    pub fn new(priority_depth: u8, general_depth: u8, max_width: usize) -> Self {
        Self {
            tactical: TranspositionTable::new(),
            general: TranspositionTable::new(),
            priority_depth,
            general_depth,
            max_width,
        }
    }

    fn table_mut(&mut self, phase: Phase) -> &mut TranspositionTable {
        match phase {
            Phase::Tactical => &mut self.tactical,
            Phase::General => &mut self.general,
        }
    }

    /// Table statistics per phase
    pub fn table_stats(&self) -> (TTStats, TTStats) {
        (self.tactical.stats(), self.general.stats())
    }

    /// Drop every cached entry
    pub fn clear(&mut self) {
        self.tactical.clear();
        self.general.clear();
    }

    /// Run one phase. `Ok(None)` when the phase had no root candidates.
    pub fn search_phase(
        &mut self,
        phase: Phase,
        position: &mut Position,
        engine_side: Stone,
        token: &CancelToken,
    ) -> Result<Option<SearchResult>, Cancelled> {
        let run = self.run_phase(phase, position, engine_side, token)?;
        let stats = run.stats.clone();
        Ok(run.into_result(stats))
    }

    fn run_phase(
        &mut self,
        phase: Phase,
        position: &mut Position,
        engine_side: Stone,
        token: &CancelToken,
    ) -> Result<PhaseRun, Cancelled> {
        let (total_depth, root_candidates) = match phase {
            Phase::Tactical => (
                self.priority_depth,
                priority_candidates(position.board(), engine_side)
                    .into_iter()
                    .map(|t| t.point)
                    .collect(),
            ),
            Phase::General => (self.general_depth, legal_candidates(position.board())),
        };
        let max_width = self.max_width;

        let mut walk = Walk {
            position,
            table: self.table_mut(phase),
            token,
            stats: SearchStats::default(),
            engine_side,
            max_width,
            total_depth: total_depth.max(1),
            root_candidates,
            cache_root: phase == Phase::General,
        };
        let root = walk.node(0, i32::MAX)?;

        debug!(
            ?phase,
            depth = total_depth,
            nodes = walk.stats.nodes,
            tt_hits = walk.stats.tt_hits,
            cutoffs = walk.stats.cutoffs,
            value = root.map(|r| r.value),
            "search phase finished"
        );

        Ok(PhaseRun {
            phase,
            depth: total_depth,
            root,
            stats: walk.stats,
        })
    }

    /// Run both phases and pick the better move.
    ///
    /// Both phases always run and the higher value wins; ties favour the
    /// tactical result. The returned statistics cover both phases.
    /// `Ok(None)` means neither phase found a move.
    pub fn search(
        &mut self,
        position: &mut Position,
        engine_side: Stone,
        token: &CancelToken,
    ) -> Result<Option<SearchResult>, Cancelled> {
        let tactical = self.run_phase(Phase::Tactical, position, engine_side, token)?;
        let general = self.run_phase(Phase::General, position, engine_side, token)?;

        let mut stats = tactical.stats.clone();
        stats.merge(&general.stats);

        let general_wins = match (tactical.root, general.root) {
            (Some(t), Some(g)) => g.value > t.value,
            (None, Some(_)) => true,
            _ => false,
        };
        let chosen = if general_wins { general } else { tactical };

        let critical = [engine_side, engine_side.opponent()]
            .into_iter()
            .any(|s| has_five_in_open_line(position.board(), s));
        debug!(
            phase = ?chosen.phase,
            value = chosen.root.map(|r| r.value),
            critical,
            nodes = stats.nodes,
            "phases arbitrated"
        );

        Ok(chosen.into_result(stats))
    }
}

/// Root outcome and counters of one phase
struct PhaseRun {
    phase: Phase,
    depth: u8,
    root: Option<Scored>,
    stats: SearchStats,
}

impl PhaseRun {
    fn into_result(self, stats: SearchStats) -> Option<SearchResult> {
        let root = self.root?;
        Some(SearchResult {
            best_point: root.point,
            value: root.value,
            phase: self.phase,
            depth: self.depth,
            stats,
        })
    }
}
