//! commit-guard library.
//!
//! Pre-commit guards that decide from the staged file set whether an
//! external check applies, run it, and turn its outcome into an exit code.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod git;
pub mod guidance;
pub mod runner;

#[cfg(test)]
mod testing;

pub use error::Error;
