//! Byte-level scanning over step-definition source text.
//!
//! Only ASCII bytes are significant, so every offset returned here lies on a
//! UTF-8 character boundary and may be used to slice the source.

use std::ops::Range;

/// Bytes after which a `/` starts a regular-expression literal rather than a
/// division.
const REGEX_PRECEDERS: &[u8] = b"(,=:[!&|?{};+-*%<>~^";

pub(super) struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
}

impl<'a> Scanner<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(super) fn byte(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    pub(super) fn slice(&self, range: Range<usize>) -> &'a str {
        self.src.get(range).unwrap_or_default()
    }

    /// One-based line number containing `pos`.
    pub(super) fn line_of(&self, pos: usize) -> usize {
        self.bytes
            .get(..pos)
            .map_or(0, |head| head.iter().filter(|&&b| b == b'\n').count())
            + 1
    }

    /// End of the line containing `pos`, excluding the newline.
    pub(super) fn line_end(&self, pos: usize) -> usize {
        self.src
            .get(pos..)
            .and_then(|rest| rest.find('\n'))
            .map_or(self.len(), |offset| pos + offset)
    }

    pub(super) fn ident_end(&self, pos: usize) -> usize {
        let mut end = pos;
        while self.byte(end).is_some_and(is_ident_continue) {
            end += 1;
        }
        end
    }

    /// Skip whitespace and comments starting at `pos`.
    pub(super) fn skip_trivia(&self, mut pos: usize) -> usize {
        loop {
            if let Some(end) = self.comment_end(pos) {
                pos = end;
            } else if self.byte(pos).is_some_and(|b| b.is_ascii_whitespace()) {
                pos += 1;
            } else {
                return pos;
            }
        }
    }

    /// Position just past the comment starting at `pos`, if one does.
    ///
    /// An unterminated block comment runs to the end of the source.
    pub(super) fn comment_end(&self, pos: usize) -> Option<usize> {
        let rest = self.src.get(pos..)?;
        if rest.starts_with("//") {
            return Some(self.line_end(pos));
        }
        if rest.starts_with("/*") {
            let body = pos + 2;
            return Some(
                self.src
                    .get(body..)
                    .and_then(|tail| tail.find("*/"))
                    .map_or(self.len(), |offset| body + offset + 2),
            );
        }
        None
    }

    /// Index of the quote closing the string literal opened at `pos`.
    ///
    /// Single and double-quoted strings may not span lines; template
    /// literals may. Returns `None` when the literal is not closed.
    pub(super) fn string_end(&self, pos: usize) -> Option<usize> {
        let quote = self.byte(pos)?;
        let mut i = pos + 1;
        loop {
            match self.byte(i)? {
                b'\\' => i += 2,
                b if b == quote => return Some(i),
                b'\n' if quote != b'`' => return None,
                _ => i += 1,
            }
        }
    }

    /// Index of the `/` closing the regular-expression literal opened at
    /// `pos`. A `/` inside a character class does not close the literal.
    pub(super) fn regex_end(&self, pos: usize) -> Option<usize> {
        let mut in_class = false;
        let mut i = pos + 1;
        loop {
            match self.byte(i)? {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'\n' => return None,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => return Some(i),
                _ => {}
            }
            i += 1;
        }
    }

    /// Whether a `/` at `pos` begins a regular-expression literal, judged by
    /// the previous significant byte.
    pub(super) fn regex_allowed(&self, pos: usize) -> bool {
        let head = self.bytes.get(..pos).unwrap_or_default();
        head.iter()
            .rev()
            .find(|b| !b.is_ascii_whitespace())
            .is_none_or(|b| REGEX_PRECEDERS.contains(b))
    }

    /// Index of the bracket closing the one opened at `open`.
    ///
    /// Strings, template literals, comments and regex literals are skipped
    /// so brackets inside them do not count.
    pub(super) fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0_usize;
        let mut pos = open;
        loop {
            let b = self.byte(pos)?;
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                b'"' | b'\'' | b'`' => pos = self.string_end(pos)?,
                b'/' => {
                    if let Some(end) = self.comment_end(pos) {
                        pos = end;
                        continue;
                    }
                    if self.regex_allowed(pos) {
                        pos = self.regex_end(pos)?;
                    }
                }
                _ => {}
            }
            pos += 1;
        }
    }
}

pub(super) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Resolve backslash escapes in a string literal body.
///
/// `\n`, `\t` and `\r` become control characters; any other escaped
/// character stands for itself.
pub(super) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""plain" rest"#, Some(6))]
    #[case(r#""esc\"aped" rest"#, Some(10))]
    #[case("'single'", Some(7))]
    #[case("`multi\nline`", Some(11))]
    #[case("\"broken\nline\"", None)]
    #[case("\"open", None)]
    fn finds_string_end(#[case] src: &str, #[case] expected: Option<usize>) {
        assert_eq!(Scanner::new(src).string_end(0), expected);
    }

    #[rstest]
    #[case(r"/I am on (\S+)$/, x", Some(15))]
    #[case(r"/a[/]b/", Some(6))]
    #[case(r"/a\/b/", Some(5))]
    #[case("/open\n/", None)]
    fn finds_regex_end(#[case] src: &str, #[case] expected: Option<usize>) {
        assert_eq!(Scanner::new(src).regex_end(0), expected);
    }

    #[test]
    fn matching_close_ignores_brackets_in_literals() {
        let src = r#"(a, ")", /[)]/, `}`, x => { f(1) /* ) */ })"#;
        assert_eq!(Scanner::new(src).matching_close(0), Some(src.len() - 1));
    }

    #[test]
    fn matching_close_treats_division_as_an_operator() {
        let src = "(a / b, c / d)";
        assert_eq!(Scanner::new(src).matching_close(0), Some(src.len() - 1));
    }

    #[test]
    fn matching_close_fails_on_unbalanced_input() {
        assert_eq!(Scanner::new("(a, { b").matching_close(0), None);
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let src = "  // note\n  /* block */  x";
        assert_eq!(Scanner::new(src).skip_trivia(0), src.len() - 1);
    }

    #[test]
    fn counts_lines_from_one() {
        let scanner = Scanner::new("a\nb\nc");
        assert_eq!(scanner.line_of(0), 1);
        assert_eq!(scanner.line_of(4), 3);
    }

    #[rstest]
    #[case(r"I have \{int\}", "I have {int}")]
    #[case(r"it\'s", "it's")]
    #[case(r"tab\there", "tab\there")]
    #[case(r"slash\\", r"slash\")]
    fn unescapes_string_bodies(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(unescape(body), expected);
    }
}
