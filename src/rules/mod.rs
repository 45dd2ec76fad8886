//! Game rules for Knight Gobang 6
//!
//! - Knight-adjacency legality for every stone after the first
//! - Win condition: six or more in a row

pub mod reach;
pub mod win;

// Re-exports for convenient access
pub use reach::{check_move, is_reachable, legal_candidates};
pub use win::{
    check_winner, find_six_positions, has_six_at, has_six_in_row, is_draw, run_from, run_through,
    WIN_LENGTH,
};
