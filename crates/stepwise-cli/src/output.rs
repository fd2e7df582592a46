//! Helpers for rendering command reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stepwise::{
    Definition, Extraction, ExtractionDiagnostic, RunReport, StepError, StepValue, TestOutcome,
    TestStatus,
};

use crate::config::OutputFormat;
use crate::error::CliError;

fn describe_definition(definition: &Definition) -> String {
    format!(
        "{} {} '{}'",
        definition.step_type.display_name(),
        definition.variant,
        definition.raw_pattern
    )
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[derive(Serialize)]
struct DiagnosticView<'a> {
    line: usize,
    offset: usize,
    message: String,
    snippet: &'a str,
}

impl<'a> From<&'a ExtractionDiagnostic> for DiagnosticView<'a> {
    fn from(diagnostic: &'a ExtractionDiagnostic) -> Self {
        Self {
            line: diagnostic.line,
            offset: diagnostic.offset,
            message: diagnostic.error.to_string(),
            snippet: &diagnostic.snippet,
        }
    }
}

#[derive(Serialize)]
struct ExtractionView<'a> {
    file: String,
    definitions: &'a [Definition],
    diagnostics: Vec<DiagnosticView<'a>>,
}

pub(crate) fn write_extractions(
    writer: &mut dyn Write,
    format: OutputFormat,
    extractions: &[(PathBuf, Extraction)],
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let views: Vec<_> = extractions
                .iter()
                .map(|(path, extraction)| ExtractionView {
                    file: path.display().to_string(),
                    definitions: &extraction.definitions,
                    diagnostics: extraction.diagnostics.iter().map(DiagnosticView::from).collect(),
                })
                .collect();
            write_json(writer, &views)
        }
        OutputFormat::Text => {
            for (path, extraction) in extractions {
                write_extraction_text(writer, path, extraction)?;
            }
            Ok(())
        }
    }
}

fn write_extraction_text(
    writer: &mut dyn Write,
    path: &Path,
    extraction: &Extraction,
) -> Result<(), CliError> {
    for definition in &extraction.definitions {
        writeln!(
            writer,
            "{} ({})",
            describe_definition(definition),
            path.display()
        )?;
    }
    for diagnostic in &extraction.diagnostics {
        writeln!(
            writer,
            "skipped {}:{} - {}",
            path.display(),
            diagnostic.line,
            diagnostic.error
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct MatchView<'a> {
    text: &'a str,
    matched: bool,
    definition: Option<&'a Definition>,
    arguments: &'a [StepValue],
}

pub(crate) fn write_match(
    writer: &mut dyn Write,
    format: OutputFormat,
    text: &str,
    found: Result<(&Definition, &[StepValue]), &StepError>,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let view = match found {
                Ok((definition, arguments)) => MatchView {
                    text,
                    matched: true,
                    definition: Some(definition),
                    arguments,
                },
                Err(_) => MatchView {
                    text,
                    matched: false,
                    definition: None,
                    arguments: &[],
                },
            };
            write_json(writer, &view)
        }
        OutputFormat::Text => match found {
            Ok((definition, arguments)) => {
                writeln!(writer, "{}", describe_definition(definition))?;
                for argument in arguments {
                    writeln!(writer, "  {argument}")?;
                }
                Ok(())
            }
            Err(err) => {
                writeln!(writer, "{err}")?;
                Ok(())
            }
        },
    }
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    path: &'a [String],
    name: &'a str,
    passed: bool,
    error: Option<String>,
}

impl<'a> From<&'a TestOutcome> for OutcomeView<'a> {
    fn from(outcome: &'a TestOutcome) -> Self {
        let error = match &outcome.status {
            TestStatus::Passed => None,
            TestStatus::Failed(err) => Some(err.to_string()),
        };
        Self {
            path: &outcome.path,
            name: &outcome.name,
            passed: error.is_none(),
            error,
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    passed: usize,
    failed: usize,
    outcomes: Vec<OutcomeView<'a>>,
}

pub(crate) fn write_report(
    writer: &mut dyn Write,
    format: OutputFormat,
    report: &RunReport,
) -> Result<(), CliError> {
    let passed = report.passed();
    let failed = report.outcomes().len() - passed;
    match format {
        OutputFormat::Json => write_json(
            writer,
            &ReportView {
                passed,
                failed,
                outcomes: report.outcomes().iter().map(OutcomeView::from).collect(),
            },
        ),
        OutputFormat::Text => {
            for outcome in report.outcomes() {
                let location = outcome
                    .path
                    .iter()
                    .chain(std::iter::once(&outcome.name))
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" > ");
                match &outcome.status {
                    TestStatus::Passed => writeln!(writer, "ok   {location}")?,
                    TestStatus::Failed(err) => {
                        writeln!(writer, "FAIL {location} - {err}")?;
                    }
                }
            }
            writeln!(writer, "{passed} passed, {failed} failed")?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests render into in-memory buffers")]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use stepwise::{StepType, Variant};

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<(), CliError>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn given_on_page() -> Definition {
        Definition::new(StepType::Given, r"I am on (\S+)$", Variant::Regex)
    }

    #[test]
    fn text_extraction_lists_definitions_and_skips() {
        let extraction = stepwise::extract_definitions(
            "Given(/I am on (\\S+)$/, url => {})\nWhen(pattern, () => {})\n",
        );
        let text = render(|w| {
            write_extractions(
                w,
                OutputFormat::Text,
                &[(PathBuf::from("steps.js"), extraction)],
            )
        });
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.first(), Some(&r"Given regex 'I am on (\S+)$' (steps.js)"));
        assert!(
            lines
                .get(1)
                .is_some_and(|line| line.starts_with("skipped steps.js:2 - "))
        );
    }

    #[test]
    fn json_match_includes_arguments() {
        let definition = given_on_page();
        let arguments = [StepValue::from("/home")];
        let text = render(|w| {
            write_match(
                w,
                OutputFormat::Json,
                "I am on /home",
                Ok((&definition, &arguments)),
            )
        });
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.get("matched"), Some(&json!(true)));
        assert_eq!(
            value.pointer("/definition/pattern"),
            Some(&json!(r"I am on (\S+)$"))
        );
        assert_eq!(value.get("arguments"), Some(&json!(["/home"])));
    }

    #[test]
    fn text_match_reports_missing_definitions() {
        let err = StepError::NoMatchingStep {
            step_type: None,
            text: "nothing".to_string(),
        };
        let text = render(|w| write_match(w, OutputFormat::Text, "nothing", Err(&err)));
        assert_eq!(text, "no step definition matches \"nothing\"\n");
    }

    #[test]
    fn empty_report_summarises() {
        let text = render(|w| write_report(w, OutputFormat::Text, &RunReport::default()));
        assert_eq!(text, "0 passed, 0 failed\n");
    }
}
