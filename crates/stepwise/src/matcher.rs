//! Compiled step matchers.
//!
//! A [`Matcher`] pairs a [`Definition`] with its compiled form. Regular
//! expression definitions search anywhere in the candidate text and yield
//! every capture group as text. Cucumber expression definitions must match
//! the whole text and yield typed values.

use log::warn;
use regex::Regex;
use stepwise_patterns::{
    CompiledExpression, PatternError, StepType, StepValue, capture_text_arguments,
    compile_expression,
};

use crate::definition::{Definition, Variant};
use crate::error::StepPatternError;

/// A pattern supplied when registering a step in code.
///
/// String patterns are Cucumber expressions; [`Regex`] values are used as
/// regular-expression definitions.
#[derive(Debug, Clone)]
pub enum StepPattern {
    /// A Cucumber expression.
    Expression(String),
    /// A compiled regular expression.
    Regex(Regex),
}

impl From<&str> for StepPattern {
    fn from(value: &str) -> Self {
        Self::Expression(value.to_string())
    }
}

impl From<String> for StepPattern {
    fn from(value: String) -> Self {
        Self::Expression(value)
    }
}

impl From<Regex> for StepPattern {
    fn from(value: Regex) -> Self {
        Self::Regex(value)
    }
}

#[derive(Debug, Clone)]
enum Compiled {
    Regex(Regex),
    Expression(CompiledExpression),
}

/// A definition compiled for matching step text.
#[derive(Debug, Clone)]
pub struct Matcher {
    definition: Definition,
    compiled: Compiled,
}

impl Matcher {
    /// Compile `definition` according to its variant.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when the regular expression is invalid or
    /// the Cucumber expression is malformed.
    ///
    /// # Examples
    /// ```
    /// use stepwise::{Definition, Matcher, Variant};
    /// use stepwise_patterns::{StepType, StepValue};
    ///
    /// let def = Definition::new(StepType::Given, "I have {int} cukes", Variant::Expression);
    /// let matcher = Matcher::compile(def).expect("expression compiles");
    /// assert_eq!(matcher.test("I have 7 cukes"), Some(vec![StepValue::Int(7)]));
    /// assert_eq!(matcher.test("I have 7 cukes today"), None);
    /// ```
    pub fn compile(definition: Definition) -> Result<Self, StepPatternError> {
        let compiled = match definition.variant {
            Variant::Regex => Regex::new(&definition.raw_pattern)
                .map(Compiled::Regex)
                .map_err(PatternError::from),
            Variant::Expression => {
                compile_expression(&definition.raw_pattern).map(Compiled::Expression)
            }
        }
        .map_err(|source| StepPatternError {
            pattern: definition.raw_pattern.clone(),
            variant: definition.variant,
            source,
        })?;
        Ok(Self {
            definition,
            compiled,
        })
    }

    /// Build a matcher from a pattern supplied in code.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when an expression pattern is malformed.
    pub fn from_pattern(
        step_type: StepType,
        pattern: impl Into<StepPattern>,
    ) -> Result<Self, StepPatternError> {
        match pattern.into() {
            StepPattern::Expression(expression) => Self::compile(Definition::new(
                step_type,
                expression,
                Variant::Expression,
            )),
            StepPattern::Regex(regex) => Ok(Self {
                definition: Definition::new(step_type, regex.as_str(), Variant::Regex),
                compiled: Compiled::Regex(regex),
            }),
        }
    }

    /// The definition this matcher was compiled from.
    #[must_use]
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Keyword of the underlying definition.
    #[must_use]
    pub fn step_type(&self) -> StepType {
        self.definition.step_type
    }

    /// Source of the regular expression actually used for matching.
    ///
    /// For expressions this is the generated, anchored regex.
    #[must_use]
    pub fn pattern_source(&self) -> &str {
        match &self.compiled {
            Compiled::Regex(regex) => regex.as_str(),
            Compiled::Expression(expression) => expression.regex().as_str(),
        }
    }

    pub(crate) fn retag(&mut self, step_type: StepType) {
        self.definition.step_type = step_type;
    }

    /// Test `candidate` and return the extracted arguments on a match.
    ///
    /// An expression capture that cannot be coerced, such as an `{int}`
    /// outside the `i64` range, counts as no match and is logged.
    #[must_use]
    pub fn test(&self, candidate: &str) -> Option<Vec<StepValue>> {
        match &self.compiled {
            Compiled::Regex(regex) => capture_text_arguments(regex, candidate),
            Compiled::Expression(expression) => expression
                .match_text(candidate)
                .unwrap_or_else(|err| {
                    warn!(
                        "step '{candidate}' matched '{}' but {err}",
                        self.definition.raw_pattern
                    );
                    None
                }),
        }
    }
}
