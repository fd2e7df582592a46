//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stepwise::StepType;

use crate::config::{LogLevel, OutputFormat};

/// Inspect step definitions and check features against them.
#[derive(Parser, Debug)]
#[command(name = "stepwise", version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Report format (text, json).
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the step definitions found in step files.
    Extract {
        /// Step-definition source files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show which definition, if any, matches a line of step text.
    Match {
        /// Step-definition source files.
        #[arg(long = "steps", required = true)]
        steps: Vec<PathBuf>,
        /// Only consider definitions of this keyword.
        #[arg(long = "type")]
        step_type: Option<StepType>,
        /// Step text without its keyword.
        text: String,
    },
    /// Run features against the extracted definitions without executing
    /// any handler, reporting steps that have no definition.
    Check {
        /// Step-definition source files.
        #[arg(long = "steps", required = true)]
        steps: Vec<PathBuf>,
        /// Feature files to check.
        #[arg(required = true)]
        features: Vec<PathBuf>,
    },
}
