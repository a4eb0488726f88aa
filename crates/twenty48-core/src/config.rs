//! Per-game settings.

use crate::board::WINNING_TILE;
use crate::game::GameError;
use crate::spawn::FOUR_PROBABILITY;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Board sizes a session can be started with
pub const SUPPORTED_SIZES: RangeInclusive<usize> = 3..=8;

/// Default board size
pub const DEFAULT_SIZE: usize = 4;

/// Settings for a single game session.
///
/// Missing fields fall back to the classic rules when deserializing, so
/// `{"size": 6}` is a complete config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the board
    pub size: usize,
    /// Tile value that wins the game
    pub target: u32,
    /// Chance that a spawned tile is a 4
    pub four_probability: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            target: WINNING_TILE,
            four_probability: FOUR_PROBABILITY,
        }
    }
}

impl GameConfig {
    /// Classic rules on a board of the given size
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<(), GameError> {
        if !SUPPORTED_SIZES.contains(&self.size) {
            return Err(GameError::UnsupportedSize(self.size));
        }
        if self.target < 4 || !self.target.is_power_of_two() {
            return Err(GameError::InvalidConfig(format!(
                "target must be a power of two >= 4, got {}",
                self.target
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(GameError::InvalidConfig(format!(
                "four_probability must be within 0..=1, got {}",
                self.four_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic() {
        let config = GameConfig::default();
        assert_eq!(config.size, 4);
        assert_eq!(config.target, 2048);
        assert_eq!(config.four_probability, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 6}"#).unwrap();
        assert_eq!(config, GameConfig::with_size(6));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            GameConfig::with_size(2).validate(),
            Err(GameError::UnsupportedSize(2))
        ));
        assert!(matches!(
            GameConfig::with_size(9).validate(),
            Err(GameError::UnsupportedSize(9))
        ));

        let mut config = GameConfig::default();
        config.target = 1000;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.four_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.four_probability = f64::NAN;
        assert!(config.validate().is_err());
    }
}
