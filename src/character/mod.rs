//! Combatant stats, leveling, and persistence.

#![allow(unused_imports)]

pub mod save;
pub mod stats;

pub use save::*;
pub use stats::*;
