//! Schema definitions for tinyrel
//!
//! This module defines table schemas and column metadata.

use super::types::DataType;
use indexmap::IndexMap;
use std::fmt;

/// Target of a foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referenced table
    pub table: String,
    /// Referenced column
    pub column: String,
}

/// Column definition in a table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// Declared type
    pub data_type: DataType,
    /// Is this the primary key?
    pub primary_key: bool,
    /// Number omitted values even when automatic keys are switched off
    pub autoincrement: bool,
    /// Must the value be non-NULL?
    pub not_null: bool,
    /// Is this column unique?
    pub unique: bool,
    /// Optional foreign key
    pub references: Option<ForeignKey>,
}

impl ColumnDefinition {
    /// Create a new column with no constraints
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            autoincrement: false,
            not_null: false,
            unique: false,
            references: None,
        }
    }

    /// Set primary key flag
    pub fn primary_key(mut self, pk: bool) -> Self {
        self.primary_key = pk;
        self
    }

    /// Set AUTOINCREMENT flag
    pub fn autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    /// Set not-null flag
    pub fn not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    /// Set unique flag
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Reference a column of another table
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// PRIMARY KEY implies NOT NULL
    pub fn rejects_null(&self) -> bool {
        self.not_null || self.primary_key
    }

    /// PRIMARY KEY implies UNIQUE
    pub fn is_key(&self) -> bool {
        self.unique || self.primary_key
    }

    /// INTEGER PRIMARY KEY columns are numbered automatically when omitted
    pub fn is_row_id_alias(&self) -> bool {
        self.primary_key && self.data_type == DataType::Integer
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.primary_key {
            write!(f, " PRIMARY KEY")?;
        }
        if self.autoincrement {
            write!(f, " AUTOINCREMENT")?;
        }
        if self.not_null {
            write!(f, " NOT NULL")?;
        }
        if self.unique {
            write!(f, " UNIQUE")?;
        }
        if let Some(fk) = &self.references {
            write!(f, " REFERENCES {}({})", fk.table, fk.column)?;
        }
        Ok(())
    }
}

/// Table schema: a name and an ordered list of columns
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    name: String,
    columns: IndexMap<String, ColumnDefinition>,
}

impl TableSchema {
    /// Create a new schema with no columns
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Build a schema from columns. Returns the name of the first duplicate
    /// column on failure.
    pub fn from_columns(
        name: impl Into<String>,
        columns: Vec<ColumnDefinition>,
    ) -> std::result::Result<Self, String> {
        let mut schema = Self::new(name);
        for col in columns {
            if schema.columns.contains_key(&col.name) {
                return Err(col.name);
            }
            schema.columns.insert(col.name.clone(), col);
        }
        Ok(schema)
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.get(name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Get all columns in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.values()
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Get the primary key column, if any
    pub fn primary_key(&self) -> Option<(usize, &ColumnDefinition)> {
        self.columns
            .values()
            .enumerate()
            .find(|(_, c)| c.primary_key)
    }
}

/// Renders the schema as a canonical CREATE TABLE statement
impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} (", self.name)?;
        for (i, col) in self.columns.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, ")")
    }
}
