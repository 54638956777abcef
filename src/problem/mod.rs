//! The problem/answer boundary.
//!
//! Problem content is supplied from outside the battle core. This module only
//! defines the seams, a reference validator, and the unit-name registry.

#![allow(unused_imports)]

pub mod registry;
pub mod types;
pub mod validator;

pub use registry::*;
pub use types::*;
pub use validator::*;
