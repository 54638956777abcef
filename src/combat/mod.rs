//! Combat math, difficulty, enemies, and turn sequencing.

#![allow(unused_imports)]

pub mod damage;
pub mod difficulty;
pub mod enemy;
pub mod turn;

pub use damage::*;
pub use difficulty::*;
pub use enemy::*;
pub use turn::*;
