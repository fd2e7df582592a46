//! Convert lexed tokens into anchored regular-expression sources.

use crate::errors::{PatternError, SyntaxErrorKind, syntax_error};
use crate::parameter::ParameterType;

use super::lexer::{Token, lex_expression};

/// Regex source plus the parameter type of each capture group, in order.
pub(crate) struct Translation {
    pub source: String,
    pub parameters: Vec<ParameterType>,
}

/// Build an anchored regular expression from a Cucumber expression.
///
/// # Errors
/// Returns [`PatternError`] when the expression names an unknown parameter
/// type or contains malformed optional or alternation syntax.
///
/// # Examples
/// ```
/// # use stepwise_patterns::build_regex_from_expression;
/// let regex = build_regex_from_expression("I have {int} item(s)")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(regex, r"^I have ([+-]?[0-9]+) item(?:s)?$");
/// ```
pub fn build_regex_from_expression(expression: &str) -> Result<String, PatternError> {
    translate(expression).map(|translation| translation.source)
}

pub(crate) fn translate(expression: &str) -> Result<Translation, PatternError> {
    let tokens = lex_expression(expression)?;
    let mut source = String::with_capacity(expression.len().saturating_mul(2) + 2);
    let mut parameters = Vec::new();
    let mut segment: Vec<Token> = Vec::new();
    source.push('^');

    for token in tokens {
        match token {
            Token::Whitespace(text) => {
                push_segment(&mut source, &segment)?;
                segment.clear();
                source.push_str(&regex::escape(&text));
            }
            Token::Parameter { start, name } => {
                push_segment(&mut source, &segment)?;
                segment.clear();
                let parameter = ParameterType::from_name(&name).ok_or_else(|| {
                    syntax_error(
                        SyntaxErrorKind::UnknownParameterType,
                        start,
                        Some(name.clone()),
                    )
                })?;
                source.push('(');
                source.push_str(parameter.sub_pattern());
                source.push(')');
                parameters.push(parameter);
            }
            other => segment.push(other),
        }
    }
    push_segment(&mut source, &segment)?;

    source.push('$');
    Ok(Translation { source, parameters })
}

/// Render a run of text, optional and alternation tokens.
fn push_segment(source: &mut String, segment: &[Token]) -> Result<(), PatternError> {
    if !segment
        .iter()
        .any(|token| matches!(token, Token::Alternation { .. }))
    {
        push_branch(source, segment);
        return Ok(());
    }

    let mut branches: Vec<&[Token]> = Vec::new();
    let mut rest = segment;
    let mut last_separator = 0;
    while let Some(split) = rest
        .iter()
        .position(|token| matches!(token, Token::Alternation { .. }))
    {
        let (branch, tail) = rest.split_at(split);
        let Some((Token::Alternation { index }, tail)) = tail.split_first() else {
            break;
        };
        validate_branch(branch, *index)?;
        branches.push(branch);
        last_separator = *index;
        rest = tail;
    }
    validate_branch(rest, last_separator + 1)?;
    branches.push(rest);

    source.push_str("(?:");
    for (i, branch) in branches.into_iter().enumerate() {
        if i > 0 {
            source.push('|');
        }
        push_branch(source, branch);
    }
    source.push(')');
    Ok(())
}

fn validate_branch(branch: &[Token], position: usize) -> Result<(), PatternError> {
    if branch.is_empty() {
        return Err(syntax_error(
            SyntaxErrorKind::EmptyAlternative,
            position,
            None,
        ));
    }
    if branch
        .iter()
        .all(|token| matches!(token, Token::Optional { .. }))
    {
        let start = match branch.first() {
            Some(Token::Optional { start, .. }) => *start,
            _ => position,
        };
        return Err(syntax_error(
            SyntaxErrorKind::OptionalOnlyAlternative,
            start,
            None,
        ));
    }
    Ok(())
}

fn push_branch(source: &mut String, branch: &[Token]) {
    for token in branch {
        match token {
            Token::Text(text) => source.push_str(&regex::escape(text)),
            Token::Optional { text, .. } => {
                source.push_str("(?:");
                source.push_str(&regex::escape(text));
                source.push_str(")?");
            }
            Token::Whitespace(_) | Token::Parameter { .. } | Token::Alternation { .. } => {}
        }
    }
}
