//! Simulation configuration.

use crate::combat::difficulty::Difficulty;
use serde::{Deserialize, Serialize};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of independent campaigns
    pub num_runs: u32,

    /// Battles fought back to back by one hero per campaign
    pub battles_per_run: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Grade the problems and enemies are drawn for
    pub grade: u32,

    pub difficulty: Difficulty,

    /// Probability the scripted player answers correctly (0.0-1.0)
    pub accuracy: f64,

    /// Player turns before a battle counts as timed out
    pub max_turns_per_battle: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            battles_per_run: 20,
            seed: None,
            grade: 3,
            difficulty: Difficulty::Medium,
            accuracy: 0.8,
            max_turns_per_battle: 200,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for comparing difficulties at one grade
    pub fn difficulty_test(difficulty: Difficulty, grade: u32) -> Self {
        Self {
            num_runs: 50,
            battles_per_run: 10,
            grade,
            difficulty,
            ..Default::default()
        }
    }

    /// Struggling player: mostly wrong answers
    pub fn struggling_player() -> Self {
        Self {
            accuracy: 0.3,
            ..Default::default()
        }
    }
}
