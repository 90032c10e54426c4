//! Shared building blocks for the shop API crates:
//! logging setup, runtime environment checks and wire types.

pub mod types;
pub mod utils;
pub mod env;
