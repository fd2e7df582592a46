//! Command line tooling for stepwise step definitions.
//!
//! The `stepwise` binary extracts definitions from step source files,
//! resolves single lines of step text against them, and dry-runs feature
//! files to find steps that have no definition.

pub mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod logging;
mod output;

pub use commands::{CommandStatus, run};
