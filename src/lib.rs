//! MathQuest - Turn-Based Math Battle Engine
//!
//! A correct answer to a math problem becomes a strong attack, a wrong one a
//! weak attack. The enemy replies under a fairness cap that rules out
//! one-shot kills. Victories award experience and gold, and the hero's stat
//! block persists between battles.
//!
//! Problem content and answer checking sit behind the traits in [`problem`].

pub mod battle;
pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod problem;
pub mod simulator;

pub use battle::{
    Battle, BattleError, BattleEvent, BattleLog, BattleObserver, BattleParams, BattleResult,
    EnemyTurnResult, NullObserver, TurnState,
};
pub use character::{HeroStore, MemoryStore, NullStore, SaveError, SaveManager, StatBlock};
pub use combat::{Difficulty, DifficultyProfile, Enemy, Side, TurnController};
pub use self::core::config::{BattleConfig, ConfigError};
pub use problem::{
    AnswerValidator, GeneratorRegistry, Problem, ProblemGenerator, StandardAnswerValidator,
    UnitDescriptor,
};
