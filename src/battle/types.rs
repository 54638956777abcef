use crate::combat::turn::TurnError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnState {
    #[default]
    Waiting,
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Victory | TurnState::Defeat)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnState::Waiting => "waiting",
            TurnState::PlayerTurn => "player-turn",
            TurnState::EnemyTurn => "enemy-turn",
            TurnState::Victory => "victory",
            TurnState::Defeat => "defeat",
        };
        f.write_str(name)
    }
}

/// Errors that stop battle progression. Invalid-turn calls are not errors;
/// they return inert results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("no problem available for grade {grade}, unit {unit:?}")]
    ProblemUnavailable { grade: u32, unit: String },

    #[error("battle has already been started")]
    AlreadyStarted,

    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Outcome of one enemy-turn resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyTurnResult {
    /// False when the call had no effect (wrong state)
    pub accepted: bool,
    pub damage: u32,
    pub hero_hp: u32,
    pub defeat: bool,
}

impl EnemyTurnResult {
    pub fn inert(hero_hp: u32) -> Self {
        Self {
            hero_hp,
            ..Default::default()
        }
    }
}

/// Outcome of one `submit_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleResult {
    /// False when the call had no effect (not the player's turn)
    pub accepted: bool,
    pub correct: bool,
    pub damage: u32,
    pub enemy_hp: u32,
    pub victory: bool,
    pub leveled_up: bool,
    pub exp_gained: u64,
    pub gold_gained: u64,
    /// Filled when the enemy reply resolved inside the same call
    pub enemy_turn: Option<EnemyTurnResult>,
}

impl BattleResult {
    pub fn inert(enemy_hp: u32) -> Self {
        Self {
            enemy_hp,
            ..Default::default()
        }
    }
}

/// Append-only narrative of one battle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleLog {
    entries: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    BattleStarted {
        enemy_name: String,
        enemy_level: u32,
        tier: u32,
    },
    PlayerAttack {
        damage: u32,
        correct: bool,
    },
    EnemyTurnScheduled {
        delay_seconds: f64,
    },
    EnemyAttack {
        damage: u32,
    },
    /// Fired exactly once per enemy-turn resolution that changed state
    EnemyTurnResolved(EnemyTurnResult),
    EnemyDefeated {
        exp_gained: u64,
        gold_gained: u64,
    },
    LeveledUp {
        new_level: u32,
    },
    HeroDefeated,
}

/// Receives battle events. Injected into the battle instead of being looked
/// up globally.
pub trait BattleObserver {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F> BattleObserver for F
where
    F: FnMut(&BattleEvent),
{
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BattleObserver for NullObserver {
    fn on_event(&mut self, _event: &BattleEvent) {}
}
