//! Logging setup for the command line tool.
//!
//! Diagnostics go to stderr so reports on stdout stay machine-readable.
//! Records emitted through the `log` facade by the `stepwise` library are
//! forwarded into the same subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `STEPWISE_LOG_LEVEL`
/// 3. The default, `warn`
///
/// If a global subscriber is already set the call does nothing.
pub fn init_logging(config: &CliConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
