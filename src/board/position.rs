//! Committed game state plus the search's trial stones

use std::sync::Arc;

use tracing::debug;

use super::{Board, HistoryEntry, Move, Point, Stone};
use crate::error::{EngineError, Result};
use crate::rules::reach::check_move;
use crate::search::zobrist::ZobristTable;

/// Board overlaid with move bookkeeping.
///
/// Committed moves are the real game. Trial moves are stones placed by the
/// search on top of them and are always removed in reverse order before the
/// search hands the position back.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    committed: Vec<Move>,
    /// Undone moves, most recent last
    redo: Vec<Move>,
    trials: Vec<Move>,
}

impl Position {
    pub fn new(size: usize, zobrist: Arc<ZobristTable>) -> Self {
        Self {
            board: Board::new(size, zobrist),
            committed: Vec::new(),
            redo: Vec::new(),
            trials: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of committed stones
    #[inline]
    pub fn step(&self) -> usize {
        self.committed.len()
    }

    #[inline]
    pub fn committed(&self) -> &[Move] {
        &self.committed
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.committed.last().copied()
    }

    /// Moves available to [`Position::redo`]
    #[inline]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[inline]
    pub fn trial_depth(&self) -> usize {
        self.trials.len()
    }

    /// Commit a real move. Clears the redo stack.
    pub fn commit(&mut self, mv: Move) -> Result<()> {
        debug_assert!(self.trials.is_empty(), "commit during search");
        check_move(&self.board, mv.point)?;
        self.board.place(mv.point, mv.stone)?;
        self.committed.push(mv);
        self.redo.clear();
        Ok(())
    }

    /// Take back the last `n` committed moves, most recent first.
    pub fn undo(&mut self, n: usize) -> Result<Vec<Move>> {
        debug_assert!(self.trials.is_empty(), "undo during search");
        if n > self.committed.len() {
            return Err(EngineError::HistoryUnderflow {
                requested: n,
                available: self.committed.len(),
            });
        }
        let mut undone = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(mv) = self.committed.pop() else { break };
            self.board.remove(mv.point)?;
            self.redo.push(mv);
            undone.push(mv);
        }
        Ok(undone)
    }

    /// Re-apply the last `n` undone moves, oldest first.
    pub fn redo(&mut self, n: usize) -> Result<Vec<Move>> {
        debug_assert!(self.trials.is_empty(), "redo during search");
        if n > self.redo.len() {
            return Err(EngineError::NothingToRedo {
                requested: n,
                available: self.redo.len(),
            });
        }
        let mut redone = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(mv) = self.redo.pop() else { break };
            self.board.place(mv.point, mv.stone)?;
            self.committed.push(mv);
            redone.push(mv);
        }
        Ok(redone)
    }

    /// Place a search stone, subject to the same legality as a real move.
    pub fn push_trial(&mut self, point: Point, stone: Stone) -> Result<()> {
        check_move(&self.board, point)?;
        self.board.place(point, stone)?;
        self.trials.push(Move::new(point, stone));
        Ok(())
    }

    /// Remove the most recent trial stone
    pub fn pop_trial(&mut self) -> Option<Move> {
        let mv = self.trials.pop()?;
        // Trial cells are only ever touched through this stack
        if self.board.remove(mv.point).is_err() {
            debug_assert!(false, "trial stone at {} vanished", mv.point);
        }
        Some(mv)
    }

    /// Pop every trial stone, returning how many were removed.
    pub fn unwind_trials(&mut self) -> usize {
        let mut removed = 0;
        while self.pop_trial().is_some() {
            removed += 1;
        }
        removed
    }

    /// Commit a stone without the knight-move check, for composing test
    /// positions that no legal game order would reach quickly.
    #[cfg(test)]
    pub(crate) fn setup(&mut self, mv: Move) -> Result<()> {
        self.board.place(mv.point, mv.stone)?;
        self.committed.push(mv);
        Ok(())
    }

    /// Rebuild the position from the shared match history.
    ///
    /// Starts from an empty board. `Retraction` takes back the last stone,
    /// `Reretraction` restores it and `Outcome` stops the replay.
    pub fn replay(&mut self, history: &[HistoryEntry]) -> Result<()> {
        let zobrist = Arc::clone(self.board.zobrist());
        *self = Self::new(self.board.size(), zobrist);

        for entry in history {
            match *entry {
                HistoryEntry::Stone(mv) => self.commit(mv)?,
                HistoryEntry::Retraction => {
                    self.undo(1)?;
                }
                HistoryEntry::Reretraction => {
                    self.redo(1)?;
                }
                HistoryEntry::Outcome(outcome) => {
                    debug!(?outcome, step = self.step(), "replay reached outcome");
                    break;
                }
            }
        }
        Ok(())
    }
}
