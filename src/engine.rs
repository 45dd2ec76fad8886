//! Engine for one side of a match
//!
//! The engine keeps its own copy of the position, updated through
//! [`Engine::commit_move`] for both sides' stones, and answers
//! [`Engine::request_move`] for its own side:
//!
//! 1. **Opening**: first stone in the centre, second a random knight's move
//!    from it
//! 2. **Tactical**: deep search rooted at threat points
//! 3. **General**: shallower search rooted at every legal point
//!
//! The better of the two searches wins; ties go to the tactical one.
//!
//! # Example
//!
//! ```
//! use knight6::{Difficulty, Engine, EngineConfig, Point, Stone};
//!
//! let config = EngineConfig::for_difficulty(Difficulty::Easy).with_depths(2, 2);
//! let mut engine = Engine::new(config, Stone::Black).unwrap();
//!
//! // On an empty board the engine opens in the centre
//! let first = engine.request_move().unwrap();
//! assert_eq!(first.point, Point::new(9, 9));
//! engine.commit_move(first.point, Stone::Black).unwrap();
//! ```

use std::sync::Arc;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::board::{Board, HistoryEntry, Move, Point, Position, Stone, KNIGHT_OFFSETS};
use crate::config::EngineConfig;
use crate::controller::{CancelToken, SearchOutcome};
use crate::error::{EngineError, Result};
use crate::rules::win::{check_winner, is_draw};
use crate::search::{Phase, SearchResult, Searcher, ZobristTable};

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Opening book, no search
    Opening,
    /// Search rooted at threat points
    Tactical,
    /// Search rooted at every legal point
    General,
}

impl From<Phase> for SearchType {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Tactical => SearchType::Tactical,
            Phase::General => SearchType::General,
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Point to play
    pub point: Point,
    /// Value from the engine's side, zero for book moves
    pub value: i32,
    /// Phase that found this move
    pub search_type: SearchType,
    /// Plies searched, zero for book moves
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn opening(point: Point) -> Self {
        Self {
            point,
            value: 0,
            search_type: SearchType::Opening,
            depth: 0,
            nodes: 0,
            time_ms: 0,
        }
    }

    #[inline]
    fn from_search(result: SearchResult, time_ms: u64) -> Self {
        Self {
            point: result.best_point,
            value: result.value,
            search_type: result.phase.into(),
            depth: result.depth,
            nodes: result.stats.nodes,
            time_ms,
        }
    }
}

/// Move-search engine for one side.
///
/// Owns its position, both transposition tables and the opening-book RNG.
/// It is `Send`, so a [`SearchController`](crate::controller::SearchController)
/// can hand it to a worker thread and back.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    side: Stone,
    position: Position,
    searcher: Searcher,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Create an engine playing `side` on an empty board.
    pub fn new(config: EngineConfig, side: Stone) -> Result<Self> {
        Self::with_zobrist(config, side, Arc::new(ZobristTable::new()))
    }

    /// Create an engine sharing an existing key table.
    pub fn with_zobrist(config: EngineConfig, side: Stone, zobrist: Arc<ZobristTable>) -> Result<Self> {
        config.validate()?;
        let position = Position::new(config.board_size, zobrist);
        let searcher = Searcher::new(config.priority_depth, config.general_depth, config.max_width);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            side,
            position,
            searcher,
            rng,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn side(&self) -> Stone {
        self.side
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.position.board()
    }

    /// Committed stones so far
    #[inline]
    pub fn step(&self) -> usize {
        self.position.step()
    }

    /// Record a stone played by either side.
    pub fn commit_move(&mut self, point: Point, stone: Stone) -> Result<()> {
        self.position.commit(Move::new(point, stone))?;
        debug!(%point, ?stone, step = self.position.step(), "move committed");
        Ok(())
    }

    /// Take back the last `n` committed moves.
    pub fn undo_moves(&mut self, n: usize) -> Result<Vec<Move>> {
        let undone = self.position.undo(n)?;
        debug!(n, step = self.position.step(), "moves undone");
        Ok(undone)
    }

    /// Restore the last `n` undone moves.
    pub fn redo_moves(&mut self, n: usize) -> Result<Vec<Move>> {
        let redone = self.position.redo(n)?;
        debug!(n, step = self.position.step(), "moves redone");
        Ok(redone)
    }

    /// Rebuild the position from the shared match history.
    pub fn replay(&mut self, history: &[HistoryEntry]) -> Result<()> {
        self.position.replay(history)?;
        debug!(entries = history.len(), step = self.position.step(), "history replayed");
        Ok(())
    }

    /// Side holding six in a row, if any
    pub fn winner(&self) -> Option<Stone> {
        check_winner(self.position.board())
    }

    /// Board full with no six in a row
    pub fn is_draw(&self) -> bool {
        is_draw(self.position.board())
    }

    /// Choose a move for this engine's side. Does not commit it.
    pub fn request_move(&mut self) -> Result<MoveResult> {
        match self.search_move(&CancelToken::new())? {
            SearchOutcome::Move(result) => Ok(result),
            // The token never leaves this call, so nothing can set it
            SearchOutcome::Cancelled => unreachable!("uncancellable search reported cancellation"),
        }
    }

    /// Choose a move, giving up once `token` is cancelled.
    ///
    /// The trial stack is empty when this returns, whatever the outcome. A
    /// result that completes after cancellation is reported as
    /// [`SearchOutcome::Cancelled`].
    pub fn search_move(&mut self, token: &CancelToken) -> Result<SearchOutcome> {
        if token.is_cancelled() {
            return Ok(SearchOutcome::Cancelled);
        }
        if let Some(point) = self.opening_move() {
            info!(%point, side = ?self.side, "opening move");
            return Ok(SearchOutcome::Move(MoveResult::opening(point)));
        }

        let start = Instant::now();
        let searched = self.searcher.search(&mut self.position, self.side, token);
        let unwound = self.position.unwind_trials();
        if unwound > 0 {
            debug!(unwound, "trial stones removed after search");
        }

        let Ok(found) = searched else {
            info!(side = ?self.side, step = self.position.step(), "search cancelled");
            return Ok(SearchOutcome::Cancelled);
        };
        if token.is_cancelled() {
            info!(side = ?self.side, "search finished after cancellation, result dropped");
            return Ok(SearchOutcome::Cancelled);
        }
        let Some(result) = found else {
            return Err(EngineError::SearchExhausted { side: self.side });
        };

        let time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = MoveResult::from_search(result, time_ms);
        info!(
            point = %result.point,
            value = result.value,
            search = ?result.search_type,
            nodes = result.nodes,
            time_ms,
            "move chosen"
        );
        Ok(SearchOutcome::Move(result))
    }

    /// Book move for the first two stones of a match.
    fn opening_move(&mut self) -> Option<Point> {
        let board = self.position.board();
        match self.position.step() {
            0 if board.is_board_empty() => Some(board.center()),
            1 => {
                let first = self.position.last_move()?.point;
                let targets: Vec<Point> = KNIGHT_OFFSETS
                    .iter()
                    .filter_map(|&dir| first.offset(dir, 1, board.size()))
                    .filter(|&p| board.is_empty(p))
                    .collect();
                let choice = targets.choose(&mut self.rng).copied();
                if choice.is_none() {
                    warn!(point = %first, "no knight move from the first stone, searching instead");
                }
                choice
            }
            _ => None,
        }
    }
}
