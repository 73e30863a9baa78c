//! Tunable game constants.
//!
//! Every timing and scoring constant the engine uses lives in
//! [`GameConfig`]. The defaults are the arcade values; shells may load
//! overrides (the headless runner reads RON).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::player::DEFAULT_LIVES;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for adversary movement choices.
    pub seed: u64,
    /// Lives at game start.
    pub starting_lives: u32,
    /// Points per collectible.
    pub collectible_points: u64,
    /// Points per power collectible.
    pub power_collectible_points: u64,
    /// Length of power mode.
    pub frightened_ms: u64,
    /// Pause after the player is hit.
    pub respawn_ms: u64,
    /// Pause before a new level starts.
    pub level_intro_ms: u64,
    /// Adversary move interval on level 1.
    pub adversary_base_interval_ms: u64,
    /// Interval reduction per level.
    pub adversary_interval_step_ms: u64,
    /// Interval floor.
    pub adversary_min_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_lives: DEFAULT_LIVES,
            collectible_points: 10,
            power_collectible_points: 50,
            frightened_ms: 10_000,
            respawn_ms: 3_000,
            level_intro_ms: 3_000,
            adversary_base_interval_ms: 500,
            adversary_interval_step_ms: 25,
            adversary_min_interval_ms: 100,
        }
    }
}

impl GameConfig {
    /// Default configuration with a specific seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Reject values that cannot drive a game.
    pub fn validate(&self) -> Result<()> {
        if self.starting_lives == 0 {
            return Err(GameError::InvalidConfig(
                "starting_lives must be at least 1".into(),
            ));
        }
        if self.adversary_min_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "adversary_min_interval_ms must be positive".into(),
            ));
        }
        if self.adversary_min_interval_ms > self.adversary_base_interval_ms {
            return Err(GameError::InvalidConfig(format!(
                "adversary_min_interval_ms ({}) exceeds adversary_base_interval_ms ({})",
                self.adversary_min_interval_ms, self.adversary_base_interval_ms
            )));
        }
        Ok(())
    }

    /// Power mode length.
    #[must_use]
    pub const fn frightened(&self) -> Duration {
        Duration::from_millis(self.frightened_ms)
    }

    /// Respawn pause length.
    #[must_use]
    pub const fn respawn(&self) -> Duration {
        Duration::from_millis(self.respawn_ms)
    }

    /// Level intro length.
    #[must_use]
    pub const fn level_intro(&self) -> Duration {
        Duration::from_millis(self.level_intro_ms)
    }

    /// Adversary move interval for a level: the base interval shortened by
    /// one step per level past the first, never below the floor.
    #[must_use]
    pub fn adversary_interval(&self, level: u32) -> Duration {
        let reduction = u64::from(level.saturating_sub(1))
            .saturating_mul(self.adversary_interval_step_ms);
        let ms = self
            .adversary_base_interval_ms
            .saturating_sub(reduction)
            .max(self.adversary_min_interval_ms);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_interval_schedule() {
        let config = GameConfig::default();
        assert_eq!(config.adversary_interval(1), Duration::from_millis(500));
        assert_eq!(config.adversary_interval(2), Duration::from_millis(475));
        assert_eq!(config.adversary_interval(17), Duration::from_millis(100));
        assert_eq!(config.adversary_interval(18), Duration::from_millis(100));
        assert_eq!(config.adversary_interval(10_000), Duration::from_millis(100));
    }

    #[test]
    fn test_interval_is_non_increasing() {
        let config = GameConfig::default();
        for level in 1..60 {
            assert!(config.adversary_interval(level + 1) <= config.adversary_interval(level));
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = GameConfig {
            starting_lives: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            adversary_min_interval_ms: 600,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            adversary_min_interval_ms: 0,
            adversary_base_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
