//! Storage module
//!
//! This module contains the in-memory storage components:
//! - Values and three-valued truth
//! - Rows
//! - Per-table row segments

pub mod row;
pub mod table;
pub mod value;

pub use row::{Row, RowId};
pub use table::TableStorage;
pub use value::{Truth, Value};
