//! Cucumber parameter types and the values they coerce to.

use std::fmt;

use crate::errors::CoercionError;

/// Built-in parameter placeholder accepted inside a Cucumber expression.
///
/// Each type owns a regular-expression fragment restricting what it may
/// capture, and a coercion rule applied to the captured text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// `{int}`: an optionally signed run of ASCII digits.
    Int,
    /// `{float}`: an optionally signed decimal number.
    Float,
    /// `{word}`: a run of non-whitespace characters.
    Word,
    /// `{string}`: a quoted span, which may contain whitespace.
    String,
}

impl ParameterType {
    /// Every built-in parameter type.
    pub const ALL: [Self; 4] = [Self::Int, Self::Float, Self::Word, Self::String];

    /// Name written between the braces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Word => "word",
            Self::String => "string",
        }
    }

    /// Placeholder token as written in an expression, e.g. `{int}`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Int => "{int}",
            Self::Float => "{float}",
            Self::Word => "{word}",
            Self::String => "{string}",
        }
    }

    /// Look up a parameter type by the name written between the braces.
    ///
    /// # Examples
    /// ```
    /// use stepwise_patterns::ParameterType;
    ///
    /// assert_eq!(ParameterType::from_name("word"), Some(ParameterType::Word));
    /// assert_eq!(ParameterType::from_name("colour"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Regular-expression fragment matched by this parameter.
    ///
    /// Fragments contain no capture groups; the compiler wraps each one in a
    /// single group so captures stay aligned with placeholders. Digit classes
    /// are spelled as ASCII ranges because `\d` admits every Unicode digit.
    #[must_use]
    pub const fn sub_pattern(self) -> &'static str {
        match self {
            Self::Int => r"[+-]?[0-9]+",
            Self::Float => r"[+-]?(?:[0-9]+\.[0-9]+|[0-9]+\.|\.[0-9]+|[0-9]+)",
            Self::Word => r"[^\s]+",
            Self::String => r#""[^"]*"|'[^']*'"#,
        }
    }

    /// Convert captured text into a typed value.
    ///
    /// # Errors
    /// Returns [`CoercionError`] when the text cannot be represented by the
    /// target type. With text captured by [`sub_pattern`](Self::sub_pattern)
    /// this only happens for integers outside the `i64` range.
    ///
    /// # Examples
    /// ```
    /// use stepwise_patterns::{ParameterType, StepValue};
    ///
    /// assert_eq!(ParameterType::Int.coerce("-7").ok(), Some(StepValue::Int(-7)));
    /// assert_eq!(
    ///     ParameterType::String.coerce("\"A string\"").ok(),
    ///     Some(StepValue::Str("A string".into()))
    /// );
    /// ```
    pub fn coerce(self, raw: &str) -> Result<StepValue, CoercionError> {
        match self {
            Self::Int => raw
                .parse::<i64>()
                .map(StepValue::Int)
                .map_err(|err| self.coercion_error(raw, &err)),
            Self::Float => raw
                .parse::<f64>()
                .map(StepValue::Float)
                .map_err(|err| self.coercion_error(raw, &err)),
            Self::Word => Ok(StepValue::Str(raw.to_string())),
            Self::String => Ok(StepValue::Str(strip_quotes(raw).to_string())),
        }
    }

    fn coercion_error(self, raw: &str, err: &dyn fmt::Display) -> CoercionError {
        CoercionError {
            parameter: self,
            value: raw.to_string(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn strip_quotes(raw: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| raw.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(raw)
}

/// A typed argument extracted from step text.
///
/// `{word}` and `{string}` placeholders, and every capture group of a
/// regular-expression definition, produce [`StepValue::Str`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum StepValue {
    /// Value captured by `{int}`.
    Int(i64),
    /// Value captured by `{float}`.
    Float(f64),
    /// Textual value.
    Str(String),
}

impl StepValue {
    /// Return the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Return the floating-point payload, if any.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Return the textual payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<i64> for StepValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for StepValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for StepValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for StepValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}
