//! Catalog module
//!
//! This module contains the schema registry, schema definitions, data types
//! and the constraint enforcer.

pub mod catalog;
pub mod constraints;
pub mod schema;
pub mod types;

pub use catalog::Catalog;
pub use constraints::ConstraintEnforcer;
pub use schema::{ColumnDefinition, ForeignKey, TableSchema};
pub use types::DataType;
