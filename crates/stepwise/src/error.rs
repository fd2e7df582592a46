//! Error types surfaced by the registries and the feature runner.
//!
//! Each failure mode has its own enum so callers can match on the variant
//! instead of inspecting message text.

use stepwise_patterns::{PatternError, StepType, UnsupportedStepType};
use thiserror::Error;

use crate::definition::Variant;

/// A step definition pattern failed to compile.
#[derive(Debug, Error)]
#[error("failed to compile {variant} step pattern '{pattern}': {source}")]
pub struct StepPatternError {
    /// The raw pattern as written in the definition.
    pub pattern: String,
    /// How the pattern was meant to be interpreted.
    pub variant: Variant,
    /// The underlying compilation error.
    #[source]
    pub source: PatternError,
}

/// Errors raised while resolving or executing a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// No registered definition matched the step text.
    #[error("no step definition matches \"{text}\"")]
    NoMatchingStep {
        /// The step type searched, or `None` for a lookup across all types.
        step_type: Option<StepType>,
        /// The step text that failed to match.
        text: String,
    },
    /// A handler reported failure.
    #[error("{0}")]
    Failed(String),
    /// A handler or hook panicked.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl StepError {
    /// Build a [`StepError::Failed`] from any displayable message.
    ///
    /// # Examples
    /// ```
    /// use stepwise::StepError;
    ///
    /// let err = StepError::failed("balance was 3, expected 4");
    /// assert_eq!(err.to_string(), "balance was 3, expected 4");
    /// ```
    #[must_use]
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::Failed(message.to_string())
    }
}

/// Errors raised by the hook registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The hook name is not one of the four lifecycle slots.
    #[error(
        "expected hook type to be one of beforeAll, afterAll, beforeEach or afterEach; found '{0}'"
    )]
    InvalidHookType(String),
}

/// Errors raised while converting Gherkin text into feature documents.
#[derive(Debug, Error)]
pub enum FeatureParseError {
    /// The Gherkin parser rejected the text.
    #[error("failed to parse feature: {0}")]
    Gherkin(#[from] gherkin::ParseError),
    /// The feature used a step keyword with no stepwise counterpart.
    #[error(transparent)]
    UnsupportedStepType(#[from] UnsupportedStepType),
}

/// Errors raised by [`Runner`](crate::Runner) and the [`TestHost`](crate::TestHost)
/// trait.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The runner input carried no feature text or documents.
    #[error("a feature file or parsed feature documents must be provided")]
    MissingFeatureText,
    /// The builder was finished without a step registry.
    #[error("a step registry must be provided")]
    MissingSteps,
    /// The host does not implement a method the runner needs.
    #[error("the test host does not provide a '{name}' method")]
    MissingTestMethod {
        /// Name of the missing host method.
        name: &'static str,
    },
    /// A JSON object or array could not be read as feature documents.
    #[error("invalid feature document: {0}")]
    InvalidFeatureDocument(#[from] serde_json::Error),
    /// Feature text failed to parse.
    #[error(transparent)]
    FeatureParse(#[from] FeatureParseError),
}
