//! Tokenizer shared by filter and path parsing.

use crate::filter::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// Attribute paths, keywords and bare literals
    Word(String),
    /// A quoted string, already unescaped
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the input
    pub position: usize,
}

impl Token {
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(word) => Some(word),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.word()
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }
}

/// Split `input` into tokens.
///
/// A word runs until whitespace, a parenthesis, a bracket or a quote. A
/// bracket directly after a word is therefore its own token, so
/// `emails[type eq "work"].value` yields `emails`, `[`, ..., `]`, `.value`.
pub(crate) fn tokenize(input: &str) -> FilterResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, character)) = chars.peek() {
        let kind = match character {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '"' => {
                let end = quoted_end(input, position)?;
                let literal = &input[position..end];
                let text: String =
                    serde_json::from_str(literal).map_err(|error| FilterError::InvalidSyntax {
                        message: format!("invalid string literal: {}", error),
                        position,
                    })?;
                while chars.peek().is_some_and(|&(index, _)| index < end) {
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Text(text),
                    position,
                });
                continue;
            }
            _ => {
                let mut end = input.len();
                while let Some(&(index, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"') {
                        end = index;
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word(input[position..end].to_string()),
                    position,
                });
                continue;
            }
        };
        chars.next();
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

/// Byte offset just past the closing quote of the string starting at `start`.
fn quoted_end(input: &str, start: usize) -> FilterResult<usize> {
    let mut escaped = false;
    for (offset, character) in input[start + 1..].char_indices() {
        match character {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Ok(start + 1 + offset + 1),
            _ => {}
        }
    }
    Err(FilterError::InvalidSyntax {
        message: "unterminated string literal".to_string(),
        position: start,
    })
}
