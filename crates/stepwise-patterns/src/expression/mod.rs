//! Cucumber-expression lexing and compilation helpers.

mod compiler;
mod lexer;

use crate::errors::{CoercionError, PatternError};
use crate::parameter::{ParameterType, StepValue};
use regex::Regex;

pub use compiler::build_regex_from_expression;

/// A Cucumber expression compiled to an anchored regular expression.
///
/// The expression matches only when it consumes the whole candidate text.
/// Each `{type}` placeholder owns exactly one capture group, so captured
/// values line up with [`parameters`](Self::parameters).
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    regex: Regex,
    parameters: Vec<ParameterType>,
}

impl CompiledExpression {
    /// The generated regular expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Parameter types in declaration order, left to right.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterType] {
        &self.parameters
    }

    /// Match `text` and coerce each captured placeholder.
    ///
    /// Returns `Ok(None)` when the text does not match.
    ///
    /// # Errors
    /// Returns [`CoercionError`] when a captured value cannot be represented
    /// by its parameter type.
    ///
    /// # Examples
    /// ```
    /// use stepwise_patterns::{StepValue, compile_expression};
    ///
    /// let expr = compile_expression("I have {int} item(s) ready to go")
    ///     .expect("expression compiles");
    /// let values = expr
    ///     .match_text("I have 2 items ready to go")
    ///     .expect("values coerce");
    /// assert_eq!(values, Some(vec![StepValue::Int(2)]));
    /// assert_eq!(expr.match_text("I have 1 item").ok(), Some(None));
    /// ```
    pub fn match_text(&self, text: &str) -> Result<Option<Vec<StepValue>>, CoercionError> {
        let Some(captures) = self.regex.captures(text) else {
            return Ok(None);
        };
        captures
            .iter()
            .skip(1)
            .zip(&self.parameters)
            .map(|(capture, parameter)| {
                parameter.coerce(capture.map_or("", |m| m.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Build and compile a regular expression from a Cucumber expression.
///
/// # Errors
/// Returns [`PatternError`] when expression parsing fails or the generated
/// regex source cannot be compiled.
pub fn compile_expression(expression: &str) -> Result<CompiledExpression, PatternError> {
    let translation = compiler::translate(expression)?;
    let regex = Regex::new(&translation.source)?;
    Ok(CompiledExpression {
        regex,
        parameters: translation.parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Display;

    fn expect_ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("{context}: {err}"),
        }
    }

    #[test]
    fn compiles_literal_expressions() {
        let expr = expect_ok(compile_expression("Given a step"), "expression should compile");
        assert_eq!(expr.regex().as_str(), "^Given a step$");
        assert!(expr.parameters().is_empty());
    }

    #[test]
    fn literal_expressions_match_whole_text_only() {
        let expr = expect_ok(compile_expression("a step"), "expression should compile");
        assert_eq!(expr.match_text("a step").ok(), Some(Some(vec![])));
        assert_eq!(expr.match_text("a step too").ok(), Some(None));
        assert_eq!(expr.match_text("not a step").ok(), Some(None));
    }

    #[test]
    fn surfaces_regex_compilation_errors() {
        let heavy = format!("prefix {}", "{float} ".repeat(100_000));
        let Err(err) = compile_expression(&heavy) else {
            panic!("expression should be too large");
        };
        assert!(matches!(
            err,
            PatternError::Regex(regex::Error::CompiledTooBig(_))
        ));
    }

    #[test]
    fn overflowing_integer_is_reported() {
        let expr = expect_ok(compile_expression("count {int}"), "expression should compile");
        assert!(expr.match_text("count 123456789012345678901234").is_err());
    }
}
