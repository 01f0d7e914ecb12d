//! Statement splitting
//!
//! Splits a script on top-level `;` tokens. Splitting works on tokens, so a
//! `;` inside a string literal or a comment never ends a statement.

use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use crate::error::Result;

/// The tokens of one statement, terminated by an Eof token
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTokens {
    /// Byte offset of the statement's first token
    pub offset: usize,
    pub tokens: Vec<Token>,
}

/// Lazy iterator over the statements of a script.
///
/// Empty statements (`;;`) are skipped. A lexical error is yielded once and
/// ends the iteration.
pub struct StatementSplitter<'a> {
    lexer: Lexer<'a>,
    done: bool,
}

impl<'a> StatementSplitter<'a> {
    pub fn new(script: &'a str) -> Self {
        Self {
            lexer: Lexer::new(script),
            done: false,
        }
    }
}

impl Iterator for StatementSplitter<'_> {
    type Item = Result<StatementTokens>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let token = match self.lexer.next_token() {
                Ok(token) => token,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match token.kind {
                TokenKind::Semicolon if tokens.is_empty() => continue,
                TokenKind::Semicolon | TokenKind::Eof => {
                    if token.kind == TokenKind::Eof {
                        self.done = true;
                        if tokens.is_empty() {
                            return None;
                        }
                    }
                    let offset = tokens[0].offset;
                    tokens.push(Token::eof(token.offset));
                    return Some(Ok(StatementTokens { offset, tokens }));
                }
                _ => tokens.push(token),
            }
        }
    }
}

/// Split a script into statements
pub fn split_statements(script: &str) -> StatementSplitter<'_> {
    StatementSplitter::new(script)
}
