//! SQL Token definitions
//!
//! Identifiers and keywords share one lexical class ([`TokenKind::Word`]);
//! the parser decides whether a word is a keyword through [`Keyword`].

use std::fmt;

/// Kind of a lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword
    Word(String),
    /// Double-quoted identifier, never a keyword
    QuotedIdent(String),

    // ========== Literals ==========
    /// Integer literal
    Integer(i64),
    /// Real literal
    Real(f64),
    /// String literal (single-quoted)
    String(String),

    // ========== Operators ==========
    /// =
    Eq,
    /// <> or !=
    Neq,
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    Lte,
    /// >=
    Gte,

    // ========== Delimiters ==========
    /// (
    LParen,
    /// )
    RParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// *
    Asterisk,

    // ========== Special ==========
    /// A character outside the language; rejected by the parser
    Unknown(char),
    /// End of input
    Eof,
}

/// A token with its raw text and byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset)
    }

    /// The keyword this token spells, if any
    pub fn keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Word(w) => Keyword::from_word(w),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

/// Keywords recognized by the parser. Only reserved ones are refused as
/// table or column names; see [`Keyword::is_reserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // DDL
    Create,
    Table,
    If,
    Exists,
    // DML
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Join,
    Inner,
    On,
    // Logic
    And,
    Or,
    Not,
    Null,
    // Constraints
    Primary,
    Key,
    Unique,
    Foreign,
    References,
    Constraint,
    Autoincrement,
    Asc,
    Desc,
    // Data Types
    Int,
    Integer,
    Real,
    Float,
    Double,
    Text,
    Varchar,
    Char,
}

impl Keyword {
    /// Try to parse a keyword from a word, case-insensitively
    pub fn from_word(s: &str) -> Option<Keyword> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Keyword::Create),
            "TABLE" => Some(Keyword::Table),
            "IF" => Some(Keyword::If),
            "EXISTS" => Some(Keyword::Exists),

            "INSERT" => Some(Keyword::Insert),
            "INTO" => Some(Keyword::Into),
            "VALUES" => Some(Keyword::Values),
            "SELECT" => Some(Keyword::Select),
            "FROM" => Some(Keyword::From),
            "WHERE" => Some(Keyword::Where),
            "JOIN" => Some(Keyword::Join),
            "INNER" => Some(Keyword::Inner),
            "ON" => Some(Keyword::On),

            "AND" => Some(Keyword::And),
            "OR" => Some(Keyword::Or),
            "NOT" => Some(Keyword::Not),
            "NULL" => Some(Keyword::Null),

            "PRIMARY" => Some(Keyword::Primary),
            "KEY" => Some(Keyword::Key),
            "UNIQUE" => Some(Keyword::Unique),
            "FOREIGN" => Some(Keyword::Foreign),
            "REFERENCES" => Some(Keyword::References),
            "CONSTRAINT" => Some(Keyword::Constraint),
            "AUTOINCREMENT" => Some(Keyword::Autoincrement),
            "ASC" => Some(Keyword::Asc),
            "DESC" => Some(Keyword::Desc),

            "INT" => Some(Keyword::Int),
            "INTEGER" => Some(Keyword::Integer),
            "REAL" => Some(Keyword::Real),
            "FLOAT" => Some(Keyword::Float),
            "DOUBLE" => Some(Keyword::Double),
            "TEXT" => Some(Keyword::Text),
            "VARCHAR" => Some(Keyword::Varchar),
            "CHAR" => Some(Keyword::Char),

            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::If => "IF",
            Keyword::Exists => "EXISTS",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Join => "JOIN",
            Keyword::Inner => "INNER",
            Keyword::On => "ON",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::Primary => "PRIMARY",
            Keyword::Key => "KEY",
            Keyword::Unique => "UNIQUE",
            Keyword::Foreign => "FOREIGN",
            Keyword::References => "REFERENCES",
            Keyword::Constraint => "CONSTRAINT",
            Keyword::Autoincrement => "AUTOINCREMENT",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::Int => "INT",
            Keyword::Integer => "INTEGER",
            Keyword::Real => "REAL",
            Keyword::Float => "FLOAT",
            Keyword::Double => "DOUBLE",
            Keyword::Text => "TEXT",
            Keyword::Varchar => "VARCHAR",
            Keyword::Char => "CHAR",
        }
    }

    /// Whether the word is refused as a table or column name. Type names and
    /// words that only appear inside a fixed clause (`KEY`, `IF NOT EXISTS`,
    /// `ASC`, `DESC`, `AUTOINCREMENT`) are not.
    pub fn is_reserved(&self) -> bool {
        !matches!(
            self,
            Keyword::If
                | Keyword::Exists
                | Keyword::Key
                | Keyword::Autoincrement
                | Keyword::Asc
                | Keyword::Desc
                | Keyword::Int
                | Keyword::Integer
                | Keyword::Real
                | Keyword::Float
                | Keyword::Double
                | Keyword::Text
                | Keyword::Varchar
                | Keyword::Char
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::QuotedIdent(w) => write!(f, "\"{}\"", w.replace('"', "\"\"")),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Real(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Neq => write!(f, "<>"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Lte => write!(f, "<="),
            TokenKind::Gte => write!(f, ">="),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Unknown(c) => write!(f, "{}", c),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parsing() {
        assert_eq!(Keyword::from_word("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_word("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_word("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_word("users"), None);
        assert_eq!(Keyword::from_word("autoincrement"), Some(Keyword::Autoincrement));
    }

    #[test]
    fn test_type_names_are_not_reserved() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::Primary.is_reserved());
        assert!(!Keyword::Text.is_reserved());
        assert!(!Keyword::Key.is_reserved());
        assert!(!Keyword::If.is_reserved());
    }

    #[test]
    fn test_quoted_identifier_is_never_keyword() {
        let word = Token::new(TokenKind::Word("table".to_string()), "table", 0);
        let quoted = Token::new(TokenKind::QuotedIdent("table".to_string()), "\"table\"", 0);
        assert!(word.is_keyword(Keyword::Table));
        assert_eq!(quoted.keyword(), None);
    }
}
