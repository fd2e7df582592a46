//! Command implementations.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use stepwise::{Extraction, Runner, StdHost, StepRegistry, StepType, extract_definitions};
use tracing::{debug, info, warn};

use crate::cli::Command;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::{write_extractions, write_match, write_report};

/// Whether a command found what it was asked to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Everything matched or passed.
    Success,
    /// A step had no definition or a check failed.
    Failure,
}

impl CommandStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failure => ExitCode::FAILURE,
        }
    }
}

/// Run `command`, writing its report to `writer`.
///
/// # Errors
///
/// Returns [`CliError`] when an input file cannot be read, an extracted
/// pattern does not compile, a feature cannot be parsed, or the report
/// cannot be written.
pub fn run(
    command: &Command,
    config: &CliConfig,
    writer: &mut dyn Write,
) -> Result<CommandStatus, CliError> {
    match command {
        Command::Extract { files } => extract(files, config, writer),
        Command::Match {
            steps,
            step_type,
            text,
        } => match_text(steps, *step_type, text, config, writer),
        Command::Check { steps, features } => check(steps, features, config, writer),
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn extract_file(path: &Path) -> Result<Extraction, CliError> {
    let extraction = extract_definitions(&read_source(path)?);
    if extraction.diagnostics.is_empty() {
        debug!(
            file = %path.display(),
            definitions = extraction.definitions.len(),
            "extracted step definitions"
        );
    } else {
        warn!(
            file = %path.display(),
            definitions = extraction.definitions.len(),
            skipped = extraction.diagnostics.len(),
            "some registrations could not be extracted"
        );
    }
    Ok(extraction)
}

/// Register every definition found in `paths` with a handler that accepts
/// any arguments, so features can be checked without running step code.
fn load_registry(paths: &[PathBuf]) -> Result<StepRegistry, CliError> {
    let mut registry = StepRegistry::new();
    for path in paths {
        for definition in extract_file(path)?.definitions {
            registry
                .register_definition(definition, |_| Ok(()))
                .map_err(|source| CliError::Pattern {
                    path: path.clone(),
                    source,
                })?;
        }
    }
    info!(definitions = registry.len(), "loaded step definitions");
    Ok(registry)
}

fn extract(
    files: &[PathBuf],
    config: &CliConfig,
    writer: &mut dyn Write,
) -> Result<CommandStatus, CliError> {
    let extractions = files
        .iter()
        .map(|path| Ok((path.clone(), extract_file(path)?)))
        .collect::<Result<Vec<_>, CliError>>()?;
    write_extractions(writer, config.output, &extractions)?;
    Ok(CommandStatus::Success)
}

fn match_text(
    steps: &[PathBuf],
    step_type: Option<StepType>,
    text: &str,
    config: &CliConfig,
    writer: &mut dyn Write,
) -> Result<CommandStatus, CliError> {
    let registry = load_registry(steps)?;
    let resolved = match step_type {
        Some(step_type) => registry.resolve_typed(step_type, text),
        None => registry.resolve(text),
    };
    let found = resolved
        .as_ref()
        .map(|step| (step.definition(), step.arguments()));
    write_match(writer, config.output, text, found)?;
    Ok(if resolved.is_ok() {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    })
}

fn check(
    steps: &[PathBuf],
    features: &[PathBuf],
    config: &CliConfig,
    writer: &mut dyn Write,
) -> Result<CommandStatus, CliError> {
    let runner = Runner::builder()
        .steps(Arc::new(load_registry(steps)?))
        .build()
        .map_err(CliError::Prepare)?;
    let mut host = StdHost::new();
    for path in features {
        runner
            .run(read_source(path)?, &mut host)
            .map_err(|source| CliError::Runner {
                path: path.clone(),
                source,
            })?;
    }
    let report = host.finish();
    write_report(writer, config.output, &report)?;
    Ok(if report.is_success() {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use temporary files they create")]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const STEPS: &str = "\
Given(/^a basket with (\\d+) items?$/, count => {})
When('I remove {int} item(s)', count => {})
Then(pattern, () => {})
";

    #[fixture]
    fn workspace() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("steps.js"), STEPS).unwrap();
        dir
    }

    fn run_to_string(command: &Command) -> (CommandStatus, String) {
        let mut buffer = Vec::new();
        let status = run(command, &CliConfig::default(), &mut buffer).unwrap();
        (status, String::from_utf8(buffer).unwrap())
    }

    #[rstest]
    fn extract_lists_definitions_and_skipped_calls(workspace: TempDir) {
        let steps = workspace.path().join("steps.js");
        let (status, text) = run_to_string(&Command::Extract {
            files: vec![steps.clone()],
        });
        assert_eq!(status, CommandStatus::Success);
        let expected = format!(
            "Given regex '^a basket with (\\d+) items?$' ({path})\n\
             When expression 'I remove {{int}} item(s)' ({path})\n\
             skipped {path}:3 - then registration pattern is neither a regex nor a string literal\n",
            path = steps.display()
        );
        assert_eq!(text, expected);
    }

    #[rstest]
    #[case("I remove 2 items", Some(StepType::When), CommandStatus::Success)]
    #[case("I remove 2 items", Some(StepType::Given), CommandStatus::Failure)]
    #[case("a basket with 1 item", None, CommandStatus::Success)]
    #[case("an empty basket", None, CommandStatus::Failure)]
    fn match_reports_status(
        workspace: TempDir,
        #[case] text: &str,
        #[case] step_type: Option<StepType>,
        #[case] expected: CommandStatus,
    ) {
        let (status, _) = run_to_string(&Command::Match {
            steps: vec![workspace.path().join("steps.js")],
            step_type,
            text: text.to_string(),
        });
        assert_eq!(status, expected);
    }

    #[rstest]
    fn check_reports_steps_without_definitions(workspace: TempDir) {
        let feature = workspace.path().join("basket.feature");
        fs::write(
            &feature,
            "Feature: Basket\n  Scenario: Remove\n    Given a basket with 3 items\n    When I remove 1 item\n    Then the basket holds 2 items\n",
        )
        .unwrap();
        let mut buffer = Vec::new();
        let config = CliConfig::default().apply_overrides(None, Some(OutputFormat::Json));
        let status = run(
            &Command::Check {
                steps: vec![workspace.path().join("steps.js")],
                features: vec![feature],
            },
            &config,
            &mut buffer,
        )
        .unwrap();
        assert_eq!(status, CommandStatus::Failure);

        let report: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(report.get("passed"), Some(&serde_json::json!(2)));
        assert_eq!(report.get("failed"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn missing_files_are_reported() {
        let mut buffer = Vec::new();
        let result = run(
            &Command::Extract {
                files: vec![PathBuf::from("does/not/exist.js")],
            },
            &CliConfig::default(),
            &mut buffer,
        );
        assert!(matches!(result, Err(CliError::Read { .. })));
    }
}
