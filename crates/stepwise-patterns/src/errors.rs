//! Errors raised while compiling Cucumber expressions and coercing the
//! values they capture.

use std::fmt;
use thiserror::Error;

use crate::parameter::ParameterType;

/// The rule a malformed expression broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// `{name}` does not name a built-in parameter type.
    UnknownParameterType,
    /// A `{` is never closed.
    UnterminatedParameter,
    /// A `{` appears inside a parameter name.
    NestedParameterBrace,
    /// A `}` has no matching `{`.
    UnmatchedBrace,
    /// A `)` has no matching `(`.
    UnmatchedParenthesis,
    /// A `(` is never closed.
    UnterminatedOptional,
    /// `()` holds no text.
    EmptyOptional,
    /// An optional contains another `(`.
    NestedOptional,
    /// An optional contains a `{parameter}`.
    OptionalParameter,
    /// A `/` has nothing on one side.
    EmptyAlternative,
    /// An alternative branch consists of optional text only.
    OptionalOnlyAlternative,
}

impl SyntaxErrorKind {
    /// Human-readable description of the rule.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownParameterType => "unknown parameter type",
            Self::UnterminatedParameter => "missing closing '}' for parameter",
            Self::NestedParameterBrace => "parameter names may not contain '{'",
            Self::UnmatchedBrace => "unmatched closing brace '}' in step expression",
            Self::UnmatchedParenthesis => "unmatched closing parenthesis ')' in step expression",
            Self::UnterminatedOptional => "missing closing ')' for optional text",
            Self::EmptyOptional => "optional text may not be empty",
            Self::NestedOptional => "optional text may not be nested",
            Self::OptionalParameter => "parameter types cannot be optional",
            Self::EmptyAlternative => "alternative may not be empty",
            Self::OptionalOnlyAlternative => "alternative may not be exclusively optional",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A malformed Cucumber expression, located by byte offset.
///
/// # Examples
/// ```
/// use stepwise_patterns::{PatternError, SyntaxErrorKind, compile_expression};
///
/// let Err(PatternError::Syntax(err)) = compile_expression("pick {colour}") else {
///     panic!("colour is not a parameter type");
/// };
/// assert_eq!(err.kind, SyntaxErrorKind::UnknownParameterType);
/// assert_eq!(err.position, 5);
/// assert_eq!(err.fragment.as_deref(), Some("colour"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ExpressionSyntaxError {
    /// The rule that was broken.
    pub kind: SyntaxErrorKind,
    /// Zero-based byte offset in the expression where the problem starts.
    pub position: usize,
    /// The offending parameter name or optional text, when there is one.
    pub fragment: Option<String>,
}

impl fmt::Display for ExpressionSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(fragment) = &self.fragment {
            write!(f, " `{fragment}`")?;
        }
        write!(f, " at byte {}", self.position)
    }
}

/// Errors surfaced while turning an expression into a regular expression.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The expression itself is malformed.
    #[error(transparent)]
    Syntax(#[from] ExpressionSyntaxError),
    /// The generated regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn syntax_error(
    kind: SyntaxErrorKind,
    position: usize,
    fragment: Option<String>,
) -> PatternError {
    PatternError::Syntax(ExpressionSyntaxError {
        kind,
        position,
        fragment,
    })
}

/// A captured substring could not be converted to its parameter's type.
///
/// The parameter sub-patterns only admit characters from each type's
/// alphabet, so the one reachable failure is an `{int}` whose digits exceed
/// the range of `i64`.
///
/// # Examples
/// ```
/// use stepwise_patterns::ParameterType;
///
/// let err = ParameterType::Int
///     .coerce("99999999999999999999")
///     .expect_err("value overflows i64");
/// assert!(err.to_string().contains("{int}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert `{value}` captured by {} parameter: {reason}", .parameter.token())]
pub struct CoercionError {
    /// Parameter type whose coercion failed.
    pub parameter: ParameterType,
    /// The captured text.
    pub value: String,
    /// Underlying parse failure rendered as text.
    pub reason: String,
}
