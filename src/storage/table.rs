//! Table storage for tinyrel
//!
//! Each table owns one segment: an insertion-ordered list of rows. Row ids
//! are never reused, even after a statement is rolled back.

use super::row::{Row, RowId};
use super::value::Value;

/// Rows of one table, in insertion order
#[derive(Debug)]
pub struct TableStorage {
    rows: Vec<Row>,
    next_row_id: RowId,
}

impl Default for TableStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStorage {
    /// Create an empty segment
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_row_id: 1,
        }
    }

    /// Append a row and return its id
    pub fn insert(&mut self, values: Vec<Value>) -> RowId {
        let id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(Row::new(id, values));
        id
    }

    /// Iterate over rows in insertion order
    pub fn scan(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row appended after the first `len` rows
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Values stored in one column, in insertion order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}
