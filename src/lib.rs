//! Move-search engine for Knight Gobang 6
//!
//! Knight Gobang 6 is played on a square board of 19, 35 or 49 lines:
//! - Black and White alternate, Black first
//! - After the first stone, every stone must land a knight's move away from
//!   some stone already on the board
//! - Six or more in a row wins; a full board with no six is a draw
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board, bitboards and the committed/trial move stacks
//! - [`rules`]: Knight-move legality and six-in-a-row detection
//! - [`eval`]: Point and board evaluation
//! - [`search`]: Zobrist hashing, transposition tables, threats and minimax
//! - [`engine`]: One side's engine combining the opening book and search
//! - [`controller`]: Background search with cancellation
//!
//! # Quick Start
//!
//! ```
//! use knight6::{Difficulty, Engine, EngineConfig, Point, Stone};
//!
//! // Shallow search so the doc test stays fast
//! let config = EngineConfig::for_difficulty(Difficulty::Easy).with_depths(2, 2);
//! let mut engine = Engine::new(config, Stone::White).unwrap();
//!
//! engine.commit_move(Point::new(9, 9), Stone::Black).unwrap();
//! let reply = engine.request_move().unwrap();
//! engine.commit_move(reply.point, Stone::White).unwrap();
//! println!("engine plays {}", reply.point);
//! ```
//!
//! # Search Priority
//!
//! Each engine turn goes through:
//! 1. Opening book for the first two stones
//! 2. Tactical search rooted at wins, blocks and double threats
//! 3. General search rooted at every legal point
//!
//! The better of the two search results is played.

pub mod board;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, HistoryEntry, Move, Point, Position, Stone};
pub use config::{Difficulty, EngineConfig};
pub use controller::{CancelToken, MoveSource, SearchController, SearchOutcome};
pub use engine::{Engine, MoveResult, SearchType};
pub use error::{EngineError, IllegalReason, Result};
