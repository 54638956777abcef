//! Difficulty profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multipliers applied for the length of one battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub boss_health_multiplier: f64,
    pub boss_attack_multiplier: f64,
    pub player_damage_multiplier: f64,
    pub experience_multiplier: f64,
    /// Extra multiplier on player damage after a wrong answer. Stacks with the
    /// halving already done in the base damage formula.
    pub wrong_answer_penalty: f64,
    /// Enemy tiers added on top of the grade/unit tier.
    pub tier_bump: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    boss_health_multiplier: 0.75,
    boss_attack_multiplier: 0.75,
    player_damage_multiplier: 1.25,
    experience_multiplier: 0.75,
    wrong_answer_penalty: 0.75,
    tier_bump: 0,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    boss_health_multiplier: 1.0,
    boss_attack_multiplier: 1.0,
    player_damage_multiplier: 1.0,
    experience_multiplier: 1.0,
    wrong_answer_penalty: 0.5,
    tier_bump: 0,
};

const HARD: DifficultyProfile = DifficultyProfile {
    boss_health_multiplier: 1.3,
    boss_attack_multiplier: 1.25,
    player_damage_multiplier: 0.9,
    experience_multiplier: 1.3,
    wrong_answer_penalty: 0.4,
    tier_bump: 1,
};

const NIGHTMARE: DifficultyProfile = DifficultyProfile {
    boss_health_multiplier: 1.6,
    boss_attack_multiplier: 1.5,
    player_damage_multiplier: 0.8,
    experience_multiplier: 1.6,
    wrong_answer_penalty: 0.25,
    tier_bump: 2,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Nightmare,
        ]
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
            Difficulty::Nightmare => &NIGHTMARE,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0:?} (expected easy, medium, hard or nightmare)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "nightmare" => Ok(Difficulty::Nightmare),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}
