//! SQL front end
//!
//! This module contains the tokenizer, the statement splitter, the parser
//! and the AST they produce.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod script;
pub mod token;

pub use ast::{
    BinaryOperator, ColumnRef, CreateTableStatement, Expr, InsertStatement, Join, SelectItem,
    SelectStatement, Statement,
};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_sql, Parser};
pub use script::{split_statements, StatementSplitter, StatementTokens};
pub use token::{Keyword, Token, TokenKind};
