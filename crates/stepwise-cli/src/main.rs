//! Entry point for the `stepwise` binary.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use eyre::{Context, Result};
use stepwise_cli::cli::Cli;
use stepwise_cli::config::CliConfig;
use stepwise_cli::logging::init_logging;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::from_env()
        .wrap_err("failed to load configuration")?
        .apply_overrides(cli.log_level, cli.format);
    init_logging(&config);
    tracing::debug!(?config, "starting stepwise");

    let mut stdout = io::stdout().lock();
    let status = stepwise_cli::run(&cli.command, &config, &mut stdout)?;
    Ok(status.exit_code())
}
