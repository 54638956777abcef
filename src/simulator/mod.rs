//! Battle balance simulator for Monte Carlo analysis.
//!
//! Runs many scripted battles to analyze:
//! - Win rate per difficulty and grade
//! - Battle length in turns
//! - Damage taken per battle and the largest single enemy hit
//! - Leveling pace over a campaign
//!
//! The simulator drives the real `Battle` orchestrator, so results match
//! actual gameplay.

mod config;
mod drill;
mod report;
mod runner;

pub use config::SimConfig;
pub use drill::ArithmeticDrill;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;
