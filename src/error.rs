//! Error types for tinyrel
//!
//! This module defines all error types used throughout the engine. Every
//! variant aborts the statement that raised it and nothing else.

use thiserror::Error;

/// The main error type for tinyrel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ========== Lexer Errors ==========
    #[error("Lexer error: unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Lexer error: unterminated block comment starting at offset {0}")]
    UnterminatedComment(usize),

    // ========== Parser Errors ==========
    #[error("Syntax error at offset {offset}: expected {expected}, found '{found}'")]
    SyntaxError {
        expected: String,
        found: String,
        offset: usize,
    },

    // ========== Schema Errors ==========
    #[error("Schema error: table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Schema error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Schema error: column '{column}' not found in {table}")]
    ColumnNotFound { table: String, column: String },

    #[error("Schema error: column '{column}' declared more than once in '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Schema error: table '{0}' declares more than one PRIMARY KEY")]
    MultiplePrimaryKeys(String),

    #[error(
        "Schema error: foreign key {table}.{column} references {ref_table}({ref_column}), {reason}"
    )]
    DanglingForeignKey {
        table: String,
        column: String,
        ref_table: String,
        ref_column: String,
        reason: String,
    },

    #[error(
        "Schema error: AUTOINCREMENT on {table}.{column} requires an INTEGER PRIMARY KEY"
    )]
    InvalidAutoincrement { table: String, column: String },

    #[error("Schema error: unknown database schema '{0}'")]
    UnknownSchema(String),

    #[error("Schema error: column reference '{0}' is ambiguous")]
    AmbiguousColumn(String),

    #[error("Schema error: table '{0}' appears more than once in the query")]
    DuplicateTableReference(String),

    // ========== Constraint Errors ==========
    #[error("Constraint violation: {table}.{column} expects {expected}, got {found}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: String,
        found: String,
    },

    #[error("Constraint violation: NOT NULL failed for {table}.{column}")]
    NotNullViolation { table: String, column: String },

    #[error("Constraint violation: UNIQUE failed for {table}.{column} (value {value})")]
    UniqueViolation {
        table: String,
        column: String,
        value: String,
    },

    #[error(
        "Constraint violation: FOREIGN KEY {table}.{column} = {value} has no match in {ref_table}({ref_column})"
    )]
    ForeignKeyViolation {
        table: String,
        column: String,
        ref_table: String,
        ref_column: String,
        value: String,
    },

    // ========== Arity Errors ==========
    #[error("Arity mismatch in '{table}' row {row}: {expected} column(s) but {found} value(s)")]
    ArityMismatch {
        table: String,
        expected: usize,
        found: usize,
        row: usize,
    },
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Syntax,
    Schema,
    Constraint,
    Arity,
}

impl Error {
    /// The family this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnterminatedString(_) | Error::UnterminatedComment(_) => ErrorCategory::Lex,
            Error::SyntaxError { .. } => ErrorCategory::Syntax,
            Error::DuplicateTable(_)
            | Error::TableNotFound(_)
            | Error::ColumnNotFound { .. }
            | Error::DuplicateColumn { .. }
            | Error::MultiplePrimaryKeys(_)
            | Error::DanglingForeignKey { .. }
            | Error::InvalidAutoincrement { .. }
            | Error::UnknownSchema(_)
            | Error::AmbiguousColumn(_)
            | Error::DuplicateTableReference(_) => ErrorCategory::Schema,
            Error::TypeMismatch { .. }
            | Error::NotNullViolation { .. }
            | Error::UniqueViolation { .. }
            | Error::ForeignKeyViolation { .. } => ErrorCategory::Constraint,
            Error::ArityMismatch { .. } => ErrorCategory::Arity,
        }
    }

    /// Source offset carried by lexer and parser errors
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnterminatedString(offset) | Error::UnterminatedComment(offset) => {
                Some(*offset)
            }
            Error::SyntaxError { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// An error raised by one statement of a script
#[derive(Error, Debug, Clone, PartialEq)]
#[error("statement #{index} (offset {offset}): {source}")]
pub struct ScriptError {
    /// Zero-based index of the failing statement
    pub index: usize,
    /// Byte offset where the failing statement starts
    pub offset: usize,
    #[source]
    pub source: Error,
}

/// Result type alias for tinyrel operations
pub type Result<T> = std::result::Result<T, Error>;
