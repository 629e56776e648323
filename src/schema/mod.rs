//! Schema module - Configuration and seeding types for Game of Life universes.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
