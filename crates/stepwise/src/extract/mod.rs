//! Discover step definitions in step-definition source text.
//!
//! Registration calls take the form `Given(<pattern>, <handler>)` (likewise
//! `When` and `Then`, in any case). The pattern must be a literal: a
//! `/regex/flags` literal yields a [`Variant::Regex`] definition and a quoted
//! string or plain template literal yields a [`Variant::Expression`]
//! definition. Calls whose first argument is anything else are reported as
//! diagnostics instead of being guessed at.
//!
//! The scan is lexical. Comments, string literals and regex literals outside
//! registration calls are skipped, and the end of each call is found by balancing
//! brackets, so handler bodies may span any number of lines.

mod scan;

use log::{debug, warn};
use stepwise_patterns::StepType;
use thiserror::Error;

use crate::definition::{Definition, Variant};
use scan::{Scanner, is_ident_start, unescape};

/// Reasons a registration call could not become a [`Definition`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The first argument is neither a regex nor a string literal.
    #[error("{step_type} registration pattern is neither a regex nor a string literal")]
    AmbiguousPattern {
        /// Keyword of the registration call.
        step_type: StepType,
    },
    /// The pattern literal is not closed.
    #[error("{step_type} registration pattern literal is not terminated")]
    UnterminatedPattern {
        /// Keyword of the registration call.
        step_type: StepType,
    },
    /// The registration call's parentheses are not balanced.
    #[error("{step_type} registration call is not closed")]
    UnterminatedCall {
        /// Keyword of the registration call.
        step_type: StepType,
    },
}

/// A registration call that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionDiagnostic {
    /// Why the call was skipped.
    pub error: ExtractionError,
    /// Byte offset of the call's keyword.
    pub offset: usize,
    /// One-based line of the call's keyword.
    pub line: usize,
    /// Source of the call, or of its first line when the call is not closed.
    pub snippet: String,
}

/// Definitions and diagnostics found in one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Definitions in source order.
    pub definitions: Vec<Definition>,
    /// Skipped registration calls in source order.
    pub diagnostics: Vec<ExtractionDiagnostic>,
}

/// Scan `source` for step registration calls.
///
/// # Examples
/// ```
/// use stepwise::{Variant, extract_definitions};
/// use stepwise_patterns::StepType;
///
/// let source = r#"
/// Given(/I am on (\S+)$/, async url => {
///   await page.goto(url)
/// })
///
/// Then("I see {int} results", count => check(count))
/// "#;
/// let found = extract_definitions(source);
/// assert_eq!(found.definitions.len(), 2);
/// assert_eq!(found.definitions[0].raw_pattern, r"I am on (\S+)$");
/// assert_eq!(found.definitions[0].variant, Variant::Regex);
/// assert_eq!(found.definitions[1].step_type, StepType::Then);
/// assert!(found.diagnostics.is_empty());
/// ```
#[must_use]
pub fn extract_definitions(source: &str) -> Extraction {
    let scanner = Scanner::new(source);
    let mut extraction = Extraction::default();
    let mut pos = 0;

    while let Some(b) = scanner.byte(pos) {
        if let Some(end) = scanner.comment_end(pos) {
            pos = end;
            continue;
        }
        pos = match b {
            b'`' => scanner.string_end(pos).map_or(scanner.len(), |end| end + 1),
            // Quoted strings cannot span lines, so an unclosed one ends with its line.
            b'"' | b'\'' => scanner
                .string_end(pos)
                .map_or_else(|| scanner.line_end(pos), |end| end + 1),
            b'/' if scanner.regex_allowed(pos) => scanner
                .regex_end(pos)
                .map_or_else(|| scanner.line_end(pos), |end| end + 1),
            b if is_ident_start(b) => {
                let end = scanner.ident_end(pos);
                match registration_call(&scanner, pos, end) {
                    Some((step_type, open)) => {
                        extract_call(&scanner, step_type, pos, open, &mut extraction)
                    }
                    None => end,
                }
            }
            _ => pos + 1,
        };
    }

    debug!(
        "extracted {} step definitions ({} skipped)",
        extraction.definitions.len(),
        extraction.diagnostics.len()
    );
    extraction
}

/// Recognise `Keyword (` at the identifier spanning `start..end`.
fn registration_call(scanner: &Scanner<'_>, start: usize, end: usize) -> Option<(StepType, usize)> {
    let step_type = scanner.slice(start..end).parse::<StepType>().ok()?;
    let open = scanner.skip_trivia(end);
    (scanner.byte(open) == Some(b'(')).then_some((step_type, open))
}

/// Record the call opened at `open` and return the position to resume at.
fn extract_call(
    scanner: &Scanner<'_>,
    step_type: StepType,
    start: usize,
    open: usize,
    out: &mut Extraction,
) -> usize {
    let Some(close) = scanner.matching_close(open) else {
        let snippet = scanner.slice(start..scanner.line_end(start));
        push_diagnostic(
            scanner,
            out,
            ExtractionError::UnterminatedCall { step_type },
            start,
            snippet,
        );
        return open + 1;
    };
    let snippet = scanner.slice(start..close + 1);

    match literal_pattern(scanner, step_type, scanner.skip_trivia(open + 1)) {
        Ok((raw_pattern, variant)) => {
            debug!("found {step_type} {variant} definition '{raw_pattern}'");
            out.definitions
                .push(Definition::new(step_type, raw_pattern, variant).with_snippet(snippet));
        }
        Err(error) => push_diagnostic(scanner, out, error, start, snippet),
    }
    close + 1
}

fn literal_pattern(
    scanner: &Scanner<'_>,
    step_type: StepType,
    start: usize,
) -> Result<(String, Variant), ExtractionError> {
    let unterminated = ExtractionError::UnterminatedPattern { step_type };
    match scanner.byte(start) {
        Some(b'/') => {
            let end = scanner.regex_end(start).ok_or(unterminated)?;
            Ok((scanner.slice(start + 1..end).to_string(), Variant::Regex))
        }
        Some(quote @ (b'"' | b'\'' | b'`')) => {
            let end = scanner.string_end(start).ok_or(unterminated)?;
            let body = scanner.slice(start + 1..end);
            if quote == b'`' && body.contains("${") {
                return Err(ExtractionError::AmbiguousPattern { step_type });
            }
            Ok((unescape(body), Variant::Expression))
        }
        _ => Err(ExtractionError::AmbiguousPattern { step_type }),
    }
}

fn push_diagnostic(
    scanner: &Scanner<'_>,
    out: &mut Extraction,
    error: ExtractionError,
    offset: usize,
    snippet: &str,
) {
    let line = scanner.line_of(offset);
    warn!("skipping step registration on line {line}: {error}");
    out.diagnostics.push(ExtractionDiagnostic {
        error,
        offset,
        line,
        snippet: snippet.to_string(),
    });
}
