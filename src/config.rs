//! Engine configuration
//!
//! Difficulty picks the board size and how hard the engine searches. The
//! resulting [`EngineConfig`] is fixed for the lifetime of an engine.

use serde::{Deserialize, Serialize};

use crate::board::MAX_BOARD_SIZE;
use crate::error::{EngineError, Result};
use crate::rules::win::WIN_LENGTH;

/// Seed for the opening-book RNG when none is given
pub const DEFAULT_SEED: u64 = 0x6b6e_6967_6874_0006;

/// Match difficulty
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Board edge length
    pub fn board_size(self) -> usize {
        match self {
            Difficulty::Easy => 19,
            Difficulty::Normal => 35,
            Difficulty::Hard => 49,
        }
    }

    /// `(priority_depth, general_depth)`
    pub fn depths(self) -> (u8, u8) {
        match self {
            Difficulty::Easy => (5, 3),
            Difficulty::Normal => (7, 5),
            Difficulty::Hard => (9, 7),
        }
    }

    /// Largest beam a node tries
    pub fn max_width(self) -> usize {
        match self {
            Difficulty::Easy => 12,
            Difficulty::Normal => 20,
            Difficulty::Hard => 32,
        }
    }
}

/// Search and board settings for one engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Board edge length
    pub board_size: usize,
    /// Plies searched in the tactical phase
    pub priority_depth: u8,
    /// Plies searched in the general phase
    pub general_depth: u8,
    /// Largest beam a node tries
    pub max_width: usize,
    /// Opening-book RNG seed
    pub seed: u64,
}

impl EngineConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (priority_depth, general_depth) = difficulty.depths();
        Self {
            board_size: difficulty.board_size(),
            priority_depth,
            general_depth,
            max_width: difficulty.max_width(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_depths(mut self, priority_depth: u8, general_depth: u8) -> Self {
        self.priority_depth = priority_depth;
        self.general_depth = general_depth;
        self
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(WIN_LENGTH..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "board size {} outside {}..={}",
                    self.board_size, WIN_LENGTH, MAX_BOARD_SIZE
                ),
            });
        }
        if self.priority_depth == 0 || self.general_depth == 0 {
            return Err(EngineError::InvalidConfig {
                message: "search depths must be at least 1".to_string(),
            });
        }
        if self.max_width == 0 {
            return Err(EngineError::InvalidConfig {
                message: "beam width must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_table() {
        let easy = EngineConfig::for_difficulty(Difficulty::Easy);
        assert_eq!(
            (easy.board_size, easy.priority_depth, easy.general_depth, easy.max_width),
            (19, 5, 3, 12)
        );
        let normal = EngineConfig::for_difficulty(Difficulty::Normal);
        assert_eq!(
            (normal.board_size, normal.priority_depth, normal.general_depth, normal.max_width),
            (35, 7, 5, 20)
        );
        let hard = EngineConfig::for_difficulty(Difficulty::Hard);
        assert_eq!(
            (hard.board_size, hard.priority_depth, hard.general_depth, hard.max_width),
            (49, 9, 7, 32)
        );
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_depths(2, 1)
            .with_max_width(4)
            .with_seed(7);
        assert_eq!(config.priority_depth, 2);
        assert_eq!(config.general_depth, 1);
        assert_eq!(config.max_width, 4);
        assert_eq!(config.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let base = EngineConfig::default();
        assert!(matches!(
            EngineConfig { board_size: 50, ..base.clone() }.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));
        assert!(base.clone().with_depths(0, 3).validate().is_err());
        assert!(base.with_max_width(0).validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::for_difficulty(Difficulty::Normal).with_seed(42);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
    }
}
