//! SQL Lexer (Tokenizer)
//!
//! This module converts SQL text into a lazy stream of tokens. Whitespace
//! and comments are dropped. The only lexical errors are an unterminated
//! string (or quoted identifier) and an unterminated block comment.

use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// SQL Lexer
pub struct Lexer<'a> {
    /// Source text
    input: &'a str,
    /// Input characters with their byte offsets
    chars: Vec<(usize, char)>,
    /// Current position in `chars`
    position: usize,
    /// Set once Eof or an error has been produced
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            position: 0,
            finished: false,
        }
    }

    /// Tokenize the entire input, including the trailing Eof token
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        if self.is_at_end() {
            return Ok(Token::eof(self.input.len()));
        }

        let start = self.position;
        let ch = self.current_char();

        let kind = match ch {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '.' => self.single(TokenKind::Dot),
            '*' => self.single(TokenKind::Asterisk),
            '=' => self.single(TokenKind::Eq),
            '<' => {
                self.advance();
                match self.peek_char(0) {
                    Some('=') => self.single(TokenKind::Lte),
                    Some('>') => self.single(TokenKind::Neq),
                    _ => TokenKind::Lt,
                }
            }
            '>' => {
                self.advance();
                if self.peek_char(0) == Some('=') {
                    self.single(TokenKind::Gte)
                } else {
                    TokenKind::Gt
                }
            }
            '!' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.single(TokenKind::Neq)
            }
            '\'' => TokenKind::String(self.read_quoted('\'')?),
            '"' => TokenKind::QuotedIdent(self.read_quoted('"')?),
            '+' | '-' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => TokenKind::Word(self.read_word()),
            c => self.single(TokenKind::Unknown(c)),
        };

        let offset = self.offset_of(start);
        let lexeme = &self.input[offset..self.offset_of(self.position)];
        Ok(Token::new(kind, lexeme, offset))
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.chars[self.position].1
    }

    /// Peek `ahead` characters past the current one
    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.position + ahead).map(|&(_, c)| c)
    }

    /// Byte offset of a character position
    fn offset_of(&self, position: usize) -> usize {
        self.chars
            .get(position)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skip whitespace, `--` comments and `/* */` comments
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            while !self.is_at_end() && self.current_char().is_whitespace() {
                self.advance();
            }

            match (self.peek_char(0), self.peek_char(1)) {
                (Some('-'), Some('-')) => {
                    while !self.is_at_end() && self.current_char() != '\n' {
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.offset_of(self.position);
                    self.advance(); // skip /
                    self.advance(); // skip *

                    loop {
                        match (self.peek_char(0), self.peek_char(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => return Err(Error::UnterminatedComment(start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Read a quoted string or identifier; a doubled quote stands for one quote
    fn read_quoted(&mut self, quote: char) -> Result<String> {
        let start = self.offset_of(self.position);
        self.advance(); // skip opening quote

        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            self.advance();

            if ch == quote {
                if self.peek_char(0) == Some(quote) {
                    value.push(quote);
                    self.advance();
                } else {
                    return Ok(value);
                }
            } else {
                value.push(ch);
            }
        }

        Err(Error::UnterminatedString(start))
    }

    /// Read a number: optional sign, digits, optional `.` + digits
    fn read_number(&mut self) -> TokenKind {
        let mut text = String::new();
        let mut is_real = false;

        if matches!(self.current_char(), '+' | '-') {
            text.push(self.current_char());
            self.advance();
        }

        while let Some(ch) = self.peek_char(0) {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_real
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_real = true;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // i64 overflow degrades to a real
        if !is_real {
            if let Ok(n) = text.parse::<i64>() {
                return TokenKind::Integer(n);
            }
        }
        TokenKind::Real(text.parse::<f64>().unwrap_or(f64::INFINITY))
    }

    /// Read an identifier or keyword
    fn read_word(&mut self) -> String {
        let mut value = String::new();

        while let Some(ch) = self.peek_char(0) {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        value
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    /// Yields tokens up to and including Eof, or a single error
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.next_token();
        if !matches!(&item, Ok(token) if token.kind != TokenKind::Eof) {
            self.finished = true;
        }
        Some(item)
    }
}

/// Tokenize a whole text
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        tokenize(sql).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.to_string())
    }

    #[test]
    fn test_select_with_where() {
        assert_eq!(
            kinds("SELECT id, name FROM users WHERE id = 1"),
            vec![
                word("SELECT"),
                word("id"),
                TokenKind::Comma,
                word("name"),
                word("FROM"),
                word("users"),
                word("WHERE"),
                word("id"),
                TokenKind::Eq,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_offsets_and_lexemes() {
        let tokens = tokenize("SELECT  users.name").unwrap();
        assert_eq!(tokens[1].offset, 8);
        assert_eq!(tokens[1].lexeme, "users");
        assert_eq!(tokens[2].kind, TokenKind::Dot);
        assert_eq!(tokens[3].offset, 14);
        assert_eq!(tokens[4].offset, 18);
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            kinds("'hello world' 'it''s'"),
            vec![
                TokenKind::String("hello world".to_string()),
                TokenKind::String("it's".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_keeps_comment_markers() {
        assert_eq!(
            kinds("'a -- b /* c */'"),
            vec![TokenKind::String("a -- b /* c */".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("30 1000.50 -7 +2.5 3."),
            vec![
                TokenKind::Integer(30),
                TokenKind::Real(1000.5),
                TokenKind::Integer(-7),
                TokenKind::Real(2.5),
                TokenKind::Integer(3),
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_overflow_becomes_real() {
        assert_eq!(
            kinds("99999999999999999999"),
            vec![TokenKind::Real(1e20), TokenKind::Eof]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            kinds("< <= > >= <> != ="),
            vec![
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::Neq,
                TokenKind::Neq,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("SELECT -- this is a comment\n* /* block\n comment */ FROM users"),
            vec![
                word("SELECT"),
                TokenKind::Asterisk,
                word("FROM"),
                word("users"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_comments_do_not_nest() {
        assert_eq!(
            kinds("/* a /* b */ x */"),
            vec![word("x"), TokenKind::Asterisk, TokenKind::Unknown('/'), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            tokenize("SELECT /* never closed").unwrap_err(),
            Error::UnterminatedComment(7)
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("INSERT INTO t VALUES ('abc").unwrap_err(),
            Error::UnterminatedString(22)
        );
    }

    #[test]
    fn test_unknown_character_is_a_token() {
        assert_eq!(
            kinds("a @ b"),
            vec![word("a"), TokenKind::Unknown('@'), word("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let items: Vec<_> = Lexer::new("a 'b").collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn test_comment_transparency() {
        let with_comments = "-- header\nCREATE /* inline */ TABLE t (\n  id INTEGER -- pk\n);";
        let without = "\nCREATE  TABLE t (\n  id INTEGER \n);";

        let strip = |sql: &str| -> Vec<(TokenKind, String)> {
            tokenize(sql)
                .unwrap()
                .into_iter()
                .map(|t| (t.kind, t.lexeme))
                .collect()
        };
        assert_eq!(strip(with_comments), strip(without));
    }
}
