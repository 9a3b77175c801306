// vivify-value - String escaping for embedded literals
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Escape codec for string payloads embedded in emitted source.
//!
//! [`escape_string`] produces the body of a double-quoted literal;
//! [`unescape_string`] is its exact inverse. Ten code-point classes are
//! rewritten, everything else passes through untouched:
//!
//! | input | output |
//! |-------|--------|
//! | `"` | `\"` |
//! | `\` | `\\` |
//! | line feed | `\n` |
//! | carriage return | `\r` |
//! | backspace | `\b` |
//! | tab | `\t` |
//! | form feed | `\f` |
//! | `<` | `\x3C` |
//! | U+2028 | `\u2028` |
//! | U+2029 | `\u2029` |
//!
//! `<` is rewritten so the output can never contain a closing-script
//! sequence when inlined into markup.

use std::fmt;

/// Escape a raw string into the body of a double-quoted literal.
///
/// # Examples
///
/// ```
/// use vivify_value::escape_string;
///
/// assert_eq!(escape_string("a\"b"), "a\\\"b");
/// assert_eq!(escape_string("<script>"), "\\x3Cscript>");
/// ```
#[must_use]
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '<' => out.push_str("\\x3C"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// Error produced by [`unescape_string`] on malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnescapeError {
    /// Byte offset of the offending backslash.
    pub position: usize,
    /// What was wrong.
    pub message: String,
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid escape at byte {}: {}", self.position, self.message)
    }
}

impl std::error::Error for UnescapeError {}

/// Invert [`escape_string`].
///
/// Only the ten sequences produced by the escape side are accepted; any
/// other backslash sequence (or a trailing backslash) is an error, which
/// keeps the pair an exact bijection.
pub fn unescape_string(input: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, '"')) => out.push('"'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 'b')) => out.push('\u{8}'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'f')) => out.push('\u{c}'),
            Some((_, 'x')) => {
                expect_sequence(&mut chars, "3C", pos)?;
                out.push('<');
            }
            Some((_, 'u')) => {
                let line = expect_one_of(&mut chars, "202", &['8', '9'], pos)?;
                out.push(if line == '8' { '\u{2028}' } else { '\u{2029}' });
            }
            Some((_, other)) => {
                return Err(UnescapeError {
                    position: pos,
                    message: format!("unknown escape sequence: \\{}", other),
                })
            }
            None => {
                return Err(UnescapeError {
                    position: pos,
                    message: "trailing backslash".to_string(),
                })
            }
        }
    }
    Ok(out)
}

fn expect_sequence(
    chars: &mut std::str::CharIndices<'_>,
    expected: &str,
    start: usize,
) -> Result<(), UnescapeError> {
    for want in expected.chars() {
        match chars.next() {
            Some((_, got)) if got == want => {}
            _ => {
                return Err(UnescapeError {
                    position: start,
                    message: format!("expected \\x{} style sequence", expected),
                })
            }
        }
    }
    Ok(())
}

fn expect_one_of(
    chars: &mut std::str::CharIndices<'_>,
    prefix: &str,
    last: &[char],
    start: usize,
) -> Result<char, UnescapeError> {
    for want in prefix.chars() {
        match chars.next() {
            Some((_, got)) if got == want => {}
            _ => {
                return Err(UnescapeError {
                    position: start,
                    message: "expected \\u2028 or \\u2029".to_string(),
                })
            }
        }
    }
    match chars.next() {
        Some((_, got)) if last.contains(&got) => Ok(got),
        _ => Err(UnescapeError {
            position: start,
            message: "expected \\u2028 or \\u2029".to_string(),
        }),
    }
}
