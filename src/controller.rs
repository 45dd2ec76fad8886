//! Background search with cancellation
//!
//! A [`SearchController`] moves its [`Engine`] onto a worker thread for the
//! duration of a search and gets it back over a channel together with the
//! result. While the worker holds the engine every call that touches the
//! position answers [`EngineError::SearchInProgress`]. A retraction cancels
//! the search, waits for the engine to come back and then undoes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::board::{HistoryEntry, Move, Point, Stone};
use crate::engine::{Engine, MoveResult};
use crate::error::{EngineError, Result};

/// Shared flag checked by the search at every node.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Move(MoveResult),
    Cancelled,
}

type WorkerReply = (Engine, Result<SearchOutcome>);

struct Worker {
    receiver: Receiver<WorkerReply>,
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Owns an engine and runs its searches off the calling thread.
pub struct SearchController {
    engine: Option<Engine>,
    worker: Option<Worker>,
}

impl SearchController {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Some(engine),
            worker: None,
        }
    }

    /// True while a worker holds the engine
    #[inline]
    pub fn is_searching(&self) -> bool {
        self.worker.is_some()
    }

    /// The engine, unless a worker currently holds it
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    fn engine_mut(&mut self) -> Result<&mut Engine> {
        if self.worker.is_some() {
            return Err(EngineError::SearchInProgress);
        }
        self.engine.as_mut().ok_or(EngineError::WorkerLost)
    }

    /// Start searching in the background. Returns the token that stops it.
    pub fn start_search(&mut self) -> Result<CancelToken> {
        if self.worker.is_some() {
            return Err(EngineError::SearchInProgress);
        }
        let mut engine = self.engine.take().ok_or(EngineError::WorkerLost)?;
        let token = CancelToken::new();
        let worker_token = token.clone();
        let (tx, rx) = mpsc::channel();

        debug!(side = ?engine.side(), step = engine.step(), "starting background search");
        let handle = thread::spawn(move || {
            let result = engine.search_move(&worker_token);
            // Receiver gone means the controller was dropped
            let _ = tx.send((engine, result));
        });

        self.worker = Some(Worker {
            receiver: rx,
            token: token.clone(),
            handle,
        });
        Ok(token)
    }

    /// Signal the running search to stop. Does not wait.
    pub fn cancel(&self) {
        if let Some(worker) = &self.worker {
            worker.token.cancel();
        }
    }

    /// Check for a finished search without blocking.
    pub fn poll(&mut self) -> Option<Result<SearchOutcome>> {
        let worker = self.worker.take()?;
        match worker.receiver.try_recv() {
            Ok(reply) => Some(self.finish(worker, reply)),
            Err(TryRecvError::Empty) => {
                self.worker = Some(worker);
                None
            }
            Err(TryRecvError::Disconnected) => Some(Self::lost(worker)),
        }
    }

    /// Block until the running search finishes.
    pub fn wait(&mut self) -> Result<SearchOutcome> {
        let worker = self.worker.take().ok_or(EngineError::NotSearching)?;
        match worker.receiver.recv() {
            Ok(reply) => self.finish(worker, reply),
            Err(_) => Self::lost(worker),
        }
    }

    fn finish(&mut self, worker: Worker, (engine, result): WorkerReply) -> Result<SearchOutcome> {
        self.engine = Some(engine);
        let _ = worker.handle.join();
        if worker.token.is_cancelled() {
            info!("search result discarded after cancellation");
            return Ok(SearchOutcome::Cancelled);
        }
        result
    }

    fn lost(worker: Worker) -> Result<SearchOutcome> {
        let panicked = worker.handle.join().is_err();
        error!(panicked, "search worker exited without returning the engine");
        Err(EngineError::WorkerLost)
    }

    /// Search in the background and block for the result.
    pub fn request_move(&mut self) -> Result<SearchOutcome> {
        self.start_search()?;
        self.wait()
    }

    /// Cancel any running search, then take back `n` moves.
    pub fn cancel_and_undo(&mut self, n: usize) -> Result<Vec<Move>> {
        if self.worker.is_some() {
            self.cancel();
            self.wait()?;
        }
        self.undo_moves(n)
    }

    pub fn commit_move(&mut self, point: Point, stone: Stone) -> Result<()> {
        self.engine_mut()?.commit_move(point, stone)
    }

    pub fn undo_moves(&mut self, n: usize) -> Result<Vec<Move>> {
        self.engine_mut()?.undo_moves(n)
    }

    pub fn redo_moves(&mut self, n: usize) -> Result<Vec<Move>> {
        self.engine_mut()?.redo_moves(n)
    }

    pub fn replay(&mut self, history: &[HistoryEntry]) -> Result<()> {
        self.engine_mut()?.replay(history)
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Who supplies the moves for one side of a match.
///
/// The turn manager forwards every committed move and every retraction to
/// both sides. A human side ignores them.
pub enum MoveSource {
    Human,
    Engine(Box<SearchController>),
}

impl MoveSource {
    pub fn engine(engine: Engine) -> Self {
        MoveSource::Engine(Box::new(SearchController::new(engine)))
    }

    pub fn is_engine(&self) -> bool {
        matches!(self, MoveSource::Engine(_))
    }

    /// Ask for a move. `Ok(None)` for a human side.
    pub fn request_move(&mut self) -> Result<Option<SearchOutcome>> {
        match self {
            MoveSource::Human => Ok(None),
            MoveSource::Engine(controller) => controller.request_move().map(Some),
        }
    }

    pub fn notify_move(&mut self, mv: Move) -> Result<()> {
        match self {
            MoveSource::Human => Ok(()),
            MoveSource::Engine(controller) => controller.commit_move(mv.point, mv.stone),
        }
    }

    /// Take back `n` moves, cancelling a running search first.
    pub fn notify_retraction(&mut self, n: usize) -> Result<()> {
        match self {
            MoveSource::Human => Ok(()),
            MoveSource::Engine(controller) => controller.cancel_and_undo(n).map(drop),
        }
    }

    pub fn notify_reretraction(&mut self, n: usize) -> Result<()> {
        match self {
            MoveSource::Human => Ok(()),
            MoveSource::Engine(controller) => controller.redo_moves(n).map(drop),
        }
    }
}
