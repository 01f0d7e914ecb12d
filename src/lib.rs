//! tinyrel - A minimal in-memory relational engine written in Rust
//!
//! This library provides:
//! - SQL front end (lexer, statement splitter, parser, AST)
//! - System catalog and constraint enforcement
//! - In-memory row storage
//! - Query execution (planner, three-valued evaluator, executor)
//! - A script runner over a [`Database`] context

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod script;
pub mod sql;
pub mod storage;

pub use config::{EngineConfig, ErrorPolicy};
pub use database::Database;
pub use error::{Error, ErrorCategory, Result, ScriptError};
pub use executor::{ExecResult, ResultSet};
pub use script::{ScriptReport, StatementOutcome};
pub use storage::{Truth, Value};
