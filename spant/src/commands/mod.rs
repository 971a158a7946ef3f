//! Command modules for the spant CLI.
//!
//! Table generation is the only command; it follows the same
//! args/command/run pattern so further commands slot in beside it.

pub mod common;
pub mod traits;

pub mod generate;

// Re-export command types and functions
pub use generate::{run_generate, GenerateArgs, GenerateCommand};
