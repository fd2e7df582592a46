//! Expression lexer converting Cucumber expressions into semantic tokens.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::errors::{PatternError, SyntaxErrorKind, syntax_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Literal characters other than whitespace.
    Text(String),
    /// A run of literal whitespace; bounds alternation groups.
    Whitespace(String),
    /// `{name}` placeholder; `start` is the byte offset of the `{`.
    Parameter { start: usize, name: String },
    /// `(text)` optional literal; `start` is the byte offset of the `(`.
    Optional { start: usize, text: String },
    /// `/` separating alternative branches.
    Alternation { index: usize },
}

type Chars<'a> = Peekable<CharIndices<'a>>;

struct Lexer<'a> {
    chars: Chars<'a>,
    tokens: Vec<Token>,
    text: String,
    whitespace: String,
}

pub(crate) fn lex_expression(expression: &str) -> Result<Vec<Token>, PatternError> {
    let mut lexer = Lexer {
        chars: expression.char_indices().peekable(),
        tokens: Vec::new(),
        text: String::new(),
        whitespace: String::new(),
    };

    while let Some((pos, ch)) = lexer.chars.next() {
        match ch {
            '\\' => {
                let escaped = lexer.chars.next().map_or('\\', |(_, next)| next);
                lexer.push_text(escaped);
            }
            '{' => {
                lexer.flush();
                let name = lex_parameter(&mut lexer.chars, pos)?;
                lexer.tokens.push(Token::Parameter { start: pos, name });
            }
            '(' => {
                lexer.flush();
                let text = lex_optional(&mut lexer.chars, pos)?;
                lexer.tokens.push(Token::Optional { start: pos, text });
            }
            '/' => {
                lexer.flush();
                lexer.tokens.push(Token::Alternation { index: pos });
            }
            '}' => {
                return Err(syntax_error(
                    SyntaxErrorKind::UnmatchedBrace,
                    pos,
                    None,
                ));
            }
            ')' => {
                return Err(syntax_error(
                    SyntaxErrorKind::UnmatchedParenthesis,
                    pos,
                    None,
                ));
            }
            c if c.is_whitespace() => {
                lexer.flush_text();
                lexer.whitespace.push(c);
            }
            c => lexer.push_text(c),
        }
    }

    lexer.flush();
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn push_text(&mut self, ch: char) {
        self.flush_whitespace();
        self.text.push(ch);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn flush_whitespace(&mut self) {
        if !self.whitespace.is_empty() {
            self.tokens
                .push(Token::Whitespace(std::mem::take(&mut self.whitespace)));
        }
    }

    fn flush(&mut self) {
        self.flush_text();
        self.flush_whitespace();
    }
}

fn lex_parameter(chars: &mut Chars<'_>, start: usize) -> Result<String, PatternError> {
    let mut name = String::new();
    for (pos, ch) in chars.by_ref() {
        match ch {
            '}' => return Ok(name),
            '{' => {
                return Err(syntax_error(
                    SyntaxErrorKind::NestedParameterBrace,
                    pos,
                    Some(name),
                ));
            }
            c => name.push(c),
        }
    }
    Err(syntax_error(
        SyntaxErrorKind::UnterminatedParameter,
        start,
        Some(name),
    ))
}

fn lex_optional(chars: &mut Chars<'_>, start: usize) -> Result<String, PatternError> {
    let mut text = String::new();
    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\\' => text.push(chars.next().map_or('\\', |(_, next)| next)),
            ')' if text.is_empty() => {
                return Err(syntax_error(
                    SyntaxErrorKind::EmptyOptional,
                    start,
                    None,
                ));
            }
            ')' => return Ok(text),
            '{' => {
                return Err(syntax_error(
                    SyntaxErrorKind::OptionalParameter,
                    pos,
                    Some(text),
                ));
            }
            '(' => {
                return Err(syntax_error(
                    SyntaxErrorKind::NestedOptional,
                    pos,
                    Some(text),
                ));
            }
            c => text.push(c),
        }
    }
    Err(syntax_error(
        SyntaxErrorKind::UnterminatedOptional,
        start,
        Some(text),
    ))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lexing fallibility")]
mod tests {
    use super::*;

    #[test]
    fn tokenises_text_whitespace_and_parameters() {
        let tokens = lex_expression("I have {int} item(s)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("I".into()),
                Token::Whitespace(" ".into()),
                Token::Text("have".into()),
                Token::Whitespace(" ".into()),
                Token::Parameter {
                    start: 7,
                    name: "int".into(),
                },
                Token::Whitespace(" ".into()),
                Token::Text("item".into()),
                Token::Optional {
                    start: 17,
                    text: "s".into(),
                },
            ]
        );
    }

    #[test]
    fn records_alternation_separators() {
        let tokens = lex_expression("optional/required").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("optional".into()),
                Token::Alternation { index: 8 },
                Token::Text("required".into()),
            ]
        );
    }

    #[test]
    fn escapes_produce_literal_characters() {
        let tokens = lex_expression(r"a\(b\)\{c\}\/d\\").unwrap();
        assert_eq!(tokens, vec![Token::Text(r"a(b){c}/d\".into())]);
    }

    #[test]
    fn keeps_multibyte_text_intact() {
        let tokens = lex_expression("café {word}").unwrap();
        assert_eq!(
            tokens.first(),
            Some(&Token::Text("café".into())),
            "non-ASCII text must survive lexing"
        );
    }

    #[test]
    fn errors_on_unterminated_parameter() {
        let err = lex_expression("count {int").unwrap_err();
        assert!(err.to_string().contains("missing closing '}'"));
    }

    #[test]
    fn errors_on_parameter_inside_optional() {
        let err = lex_expression("I have ({int})").unwrap_err();
        assert!(err.to_string().contains("cannot be optional"));
    }

    #[test]
    fn errors_on_stray_closing_characters() {
        assert!(lex_expression("broken}").is_err());
        assert!(lex_expression("broken)").is_err());
    }
}
