//! Error types for the command line tool.

use std::path::PathBuf;

use stepwise::{RunnerError, StepPatternError};
use thiserror::Error;

/// Errors that stop a command before it can report anything.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A step or feature file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An extracted pattern does not compile.
    #[error("{}: {source}", path.display())]
    Pattern {
        /// Step file holding the definition.
        path: PathBuf,
        /// Compilation failure.
        #[source]
        source: StepPatternError,
    },

    /// A feature could not be parsed or run.
    #[error("{}: {source}", path.display())]
    Runner {
        /// Feature file being run.
        path: PathBuf,
        /// Runner failure.
        #[source]
        source: RunnerError,
    },

    /// The runner could not be assembled.
    #[error("failed to prepare runner: {0}")]
    Prepare(#[source] RunnerError),

    /// Report output could not be written.
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    /// A JSON report could not be serialised.
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_displays_message() {
        let error = CliError::InvalidConfig("bad value".to_string());
        assert_eq!(error.to_string(), "invalid configuration: bad value");
    }

    #[test]
    fn read_error_names_the_file() {
        let error = CliError::Read {
            path: PathBuf::from("steps/missing.js"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(error.to_string(), "failed to read steps/missing.js: not found");
    }
}
