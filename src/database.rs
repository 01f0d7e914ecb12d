//! Database context
//!
//! A [`Database`] owns the catalog, the row storage of every table and the
//! engine configuration. It starts empty and only grows.

use std::collections::HashMap;

use crate::catalog::{Catalog, TableSchema};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::executor::{ExecResult, ExecutionEngine};
use crate::script::{ScriptReport, ScriptRunner};
use crate::sql::{parser, Statement};
use crate::storage::TableStorage;

/// In-memory database: catalog plus per-table storage
#[derive(Debug, Default)]
pub struct Database {
    catalog: Catalog,
    storage: HashMap<String, TableStorage>,
    config: EngineConfig,
}

impl Database {
    /// Create an empty database with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database with the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            catalog: Catalog::new(),
            storage: HashMap::new(),
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a schema and allocate empty storage for it
    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();
        self.catalog.register_table(schema)?;
        self.storage.insert(name, TableStorage::new());
        Ok(())
    }

    /// Get the rows of a table
    pub fn storage(&self, table: &str) -> Result<&TableStorage> {
        self.storage
            .get(table)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))
    }

    /// Get the rows of a table for writing
    pub fn storage_mut(&mut self, table: &str) -> Result<&mut TableStorage> {
        self.storage
            .get_mut(table)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))
    }

    /// Table names, in creation order
    pub fn table_names(&self) -> Vec<&str> {
        self.catalog.list_tables()
    }

    /// Number of stored rows in a table
    pub fn row_count(&self, table: &str) -> Result<usize> {
        Ok(self.storage(table)?.len())
    }

    /// Execute one parsed statement
    pub fn execute(&mut self, stmt: &Statement) -> Result<ExecResult> {
        ExecutionEngine::new(self).execute(stmt)
    }

    /// Parse and execute exactly one statement. A trailing `;` is allowed.
    pub fn execute_sql(&mut self, sql: &str) -> Result<ExecResult> {
        let stmt = parser::parse_sql(sql)?;
        self.execute(&stmt)
    }

    /// Run a whole script, statement by statement
    pub fn run_script(&mut self, script: &str) -> ScriptReport {
        ScriptRunner::new(self).run(script)
    }
}
