//! System Catalog for tinyrel
//!
//! The catalog maps table names to their schemas. It only grows: there is
//! no ALTER or DROP.

use super::constraints::ConstraintEnforcer;
use super::schema::TableSchema;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// System Catalog - the registry of table schemas
#[derive(Debug, Default)]
pub struct Catalog {
    /// Table schemas by name, in registration order
    tables: IndexMap<String, TableSchema>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new table.
    ///
    /// Fails with `DuplicateTable` if the name is taken, or with the first
    /// schema problem found by [`ConstraintEnforcer::check_schema`].
    pub fn register_table(&mut self, schema: TableSchema) -> Result<&TableSchema> {
        if self.tables.contains_key(schema.name()) {
            return Err(Error::DuplicateTable(schema.name().to_string()));
        }

        ConstraintEnforcer::check_schema(self, &schema)?;

        let name = schema.name().to_string();
        let entry = self.tables.entry(name).or_insert(schema);
        Ok(entry)
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Result<&TableSchema> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// List all table names, in creation order
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}
