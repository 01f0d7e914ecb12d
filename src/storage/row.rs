//! Row type for tinyrel

use super::value::Value;

/// Identifier assigned to a row when it is stored
pub type RowId = u64;

/// A stored row: values in table column order plus its row id
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: Vec<Value>,
}

impl Row {
    pub fn new(id: RowId, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get value at column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}
