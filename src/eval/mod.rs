//! Evaluation module for Knight Gobang 6 positions
//!
//! This module provides line scoring and position evaluation:
//! - Point values for move ordering
//! - Board values per color and their differential
//! - The victory threshold shared with the search

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate_board, evaluate_differential, evaluate_point, is_decisive};
pub use patterns::PatternScore;
