//! Search module for Knight Gobang 6
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition tables caching each phase's results
//! - Threat detection for the tactical root
//! - Two-phase beam minimax

pub mod minimax;
pub mod threat;
pub mod tt;
pub mod zobrist;

pub use minimax::{beam_width, Cancelled, Phase, SearchResult, SearchStats, Searcher};
pub use threat::{
    double_threat_points, forced_win_points, has_five_in_open_line, priority_candidates,
    ThreatPoint,
};
pub use tt::{TTEntry, TTStats, TranspositionTable};
pub use zobrist::{Fingerprint, ZobristTable};
