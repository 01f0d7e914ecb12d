//! Data types for tinyrel
//!
//! This module defines the SQL column types supported by the engine and
//! which values each type accepts.

use crate::storage::Value;
use std::fmt;

/// SQL Data Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Real,
    /// UTF-8 text
    Text,
}

impl DataType {
    /// Fit a value to this column type.
    ///
    /// NULL fits every type. With `promote_integers`, an integer stored in a
    /// REAL column becomes a real. Any other kind mismatch returns `None`.
    pub fn coerce(&self, value: Value, promote_integers: bool) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => Some(Value::Null),
            (DataType::Integer, v @ Value::Integer(_)) => Some(v),
            (DataType::Real, v @ Value::Real(_)) => Some(v),
            (DataType::Real, Value::Integer(i)) if promote_integers => Some(Value::Real(i as f64)),
            (DataType::Text, v @ Value::Text(_)) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Real => write!(f, "REAL"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}
