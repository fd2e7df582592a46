//! Step definition records shared by the extractor, matcher and registry.

use std::fmt;

use serde::{Deserialize, Serialize};
use stepwise_patterns::StepType;

/// How a definition's pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// The pattern is a regular expression, matched anywhere in the text.
    Regex,
    /// The pattern is a Cucumber expression, matched against the whole text.
    Expression,
}

impl Variant {
    /// Lower-case name used in messages and serialised records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Expression => "expression",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step definition as written in source: its keyword, pattern and the
/// source text of the whole registration call.
///
/// # Examples
/// ```
/// use stepwise::{Definition, Variant};
/// use stepwise_patterns::StepType;
///
/// let def = Definition::new(StepType::Given, "I have {int} cukes", Variant::Expression);
/// assert_eq!(def.raw_pattern, "I have {int} cukes");
/// assert!(def.snippet.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Keyword the definition was registered under.
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Pattern text: a regex body without delimiters or flags, or an
    /// expression with string escapes resolved.
    #[serde(rename = "pattern")]
    pub raw_pattern: String,
    /// Interpretation of [`raw_pattern`](Self::raw_pattern).
    pub variant: Variant,
    /// Verbatim source of the registration call, empty when the definition
    /// was built in code.
    #[serde(default, rename = "source")]
    pub snippet: String,
}

impl Definition {
    /// Create a definition with no source snippet.
    #[must_use]
    pub fn new(step_type: StepType, raw_pattern: impl Into<String>, variant: Variant) -> Self {
        Self {
            step_type,
            raw_pattern: raw_pattern.into(),
            variant,
            snippet: String::new(),
        }
    }

    /// Attach the registration call's source text.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }
}
