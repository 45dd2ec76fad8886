//! Error types for the engine
//!
//! Legality and exhaustion errors are surfaced to the turn manager. A
//! cancelled search is not an error; it is reported as
//! [`SearchOutcome::Cancelled`](crate::controller::SearchOutcome).

use std::fmt;

use thiserror::Error;

use crate::board::{Point, Stone};

/// Why a point was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// Outside `[0, size)`
    OutOfRange,
    /// Already holds a stone
    Occupied,
    /// No stone a knight's move away
    Unreachable,
    /// Removal requested on an empty cell
    Vacant,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalReason::OutOfRange => "out of range",
            IllegalReason::Occupied => "occupied",
            IllegalReason::Unreachable => "not a knight's move from any stone",
            IllegalReason::Vacant => "no stone to remove",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A commit or trial targeted a point that cannot take a stone
    #[error("illegal move at {point}: {reason}")]
    IllegalMove { point: Point, reason: IllegalReason },

    /// Neither search phase produced a candidate
    #[error("search exhausted: no legal candidate for {side:?}")]
    SearchExhausted { side: Stone },

    /// Undo asked for more moves than were committed
    #[error("cannot undo {requested} moves, only {available} committed")]
    HistoryUnderflow { requested: usize, available: usize },

    /// Redo asked for more moves than were undone
    #[error("cannot redo {requested} moves, only {available} undone")]
    NothingToRedo { requested: usize, available: usize },

    /// The engine is currently owned by a search worker
    #[error("a search is already in progress")]
    SearchInProgress,

    /// Waited on a controller with no search running
    #[error("no search is running")]
    NotSearching,

    /// The search worker went away without returning the engine
    #[error("search worker terminated unexpectedly")]
    WorkerLost,

    /// Configuration rejected by [`EngineConfig::validate`](crate::config::EngineConfig::validate)
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl EngineError {
    #[inline]
    pub(crate) fn illegal(point: Point, reason: IllegalReason) -> Self {
        EngineError::IllegalMove { point, reason }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
