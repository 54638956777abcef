//! Turn sequencing: exactly one side acts at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Enemy => f.write_str("enemy"),
        }
    }
}

/// Errors that can occur during turn operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("cannot start {requested} turn while {active} turn is active")]
    AlreadyActive { active: Side, requested: Side },

    #[error("no turn is currently active")]
    NoActiveTurn,
}

/// Tracks whose turn it is and how many full exchanges have happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnController {
    active: Option<Side>,
    turn_count: u32,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a turn for `side`. Fails if any side is already active.
    pub fn start_turn(&mut self, side: Side) -> Result<(), TurnError> {
        if let Some(active) = self.active {
            return Err(TurnError::AlreadyActive {
                active,
                requested: side,
            });
        }
        self.active = Some(side);
        Ok(())
    }

    /// Ends the active turn and returns which side it was.
    /// Ending an enemy turn completes one player+enemy exchange.
    pub fn end_turn(&mut self) -> Result<Side, TurnError> {
        let side = self.active.take().ok_or(TurnError::NoActiveTurn)?;
        if side == Side::Enemy {
            self.turn_count += 1;
        }
        Ok(side)
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.turn_count = 0;
    }

    pub fn active_side(&self) -> Option<Side> {
        self.active
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }
}
