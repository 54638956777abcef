//! Battle configuration.
//!
//! Balance numbers live in [`crate::core::constants`]; this struct only holds
//! the knobs a caller may reasonably change per session (presentation delay,
//! RNG seed, tier ceiling).

use crate::core::constants::{ENEMY_TURN_DELAY_SECONDS, MAX_TIER, MIN_TIER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one battle session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seconds between a landed player hit and the enemy's reply.
    /// Zero resolves the enemy turn inside `submit_answer`.
    pub enemy_turn_delay_seconds: f64,

    /// Random seed for reproducibility (None = OS entropy)
    pub seed: Option<u64>,

    /// Highest enemy tier a difficulty bump may reach
    pub max_tier: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            enemy_turn_delay_seconds: ENEMY_TURN_DELAY_SECONDS,
            seed: None,
            max_tier: MAX_TIER,
        }
    }
}

impl BattleConfig {
    /// Enemy turns resolve synchronously. Used by tests and the simulator.
    pub fn instant() -> Self {
        Self {
            enemy_turn_delay_seconds: 0.0,
            ..Default::default()
        }
    }

    /// Instant resolution with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::instant()
        }
    }

    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enemy_turn_delay_seconds.is_finite() || self.enemy_turn_delay_seconds < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "enemy_turn_delay_seconds must be a non-negative number, got {}",
                self.enemy_turn_delay_seconds
            )));
        }
        if !(MIN_TIER..=MAX_TIER).contains(&self.max_tier) {
            return Err(ConfigError::Invalid(format!(
                "max_tier must be between {} and {}, got {}",
                MIN_TIER, MAX_TIER, self.max_tier
            )));
        }
        Ok(())
    }
}
