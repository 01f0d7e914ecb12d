//! Query Executor for tinyrel
//!
//! This module executes parsed statements against a [`Database`] and
//! returns results.

use serde::Serialize;

use super::planner::{InsertPlan, Planner, SelectPlan};
use crate::catalog::{ConstraintEnforcer, TableSchema};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::storage::Value;

/// Column names plus ordered rows of a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    /// Column names
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of one executed statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExecResult {
    /// A table was created
    Created(String),
    /// Number of rows inserted
    Inserted(usize),
    /// Query result
    Rows(ResultSet),
}

impl ExecResult {
    /// The result set of a query, if this was one
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            ExecResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Execution Engine
pub struct ExecutionEngine<'a> {
    db: &'a mut Database,
}

impl<'a> ExecutionEngine<'a> {
    /// Create a new execution engine over a database
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Execute one statement
    pub fn execute(&mut self, stmt: &Statement) -> Result<ExecResult> {
        match stmt {
            Statement::CreateTable(create) => self.execute_create_table(create),
            Statement::Insert(insert) => self.execute_insert(insert),
            Statement::Select(select) => self.execute_select(select),
        }
    }

    fn execute_create_table(&mut self, create: &CreateTableStatement) -> Result<ExecResult> {
        // A single database: `main` is the only schema
        if let Some(schema) = &create.schema {
            if !schema.eq_ignore_ascii_case("main") {
                return Err(Error::UnknownSchema(schema.clone()));
            }
        }

        if create.if_not_exists && self.db.catalog().table_exists(&create.name) {
            tracing::debug!(table = %create.name, "table exists, skipped");
            return Ok(ExecResult::Created(create.name.clone()));
        }

        let schema = TableSchema::from_columns(&create.name, create.columns.clone()).map_err(
            |column| Error::DuplicateColumn {
                table: create.name.clone(),
                column,
            },
        )?;

        self.db.create_table(schema)?;

        tracing::debug!(
            table = %create.name,
            columns = create.columns.len(),
            "created table"
        );
        Ok(ExecResult::Created(create.name.clone()))
    }

    /// Insert every tuple or none: the first failing row truncates the table
    /// back to its length before the statement.
    fn execute_insert(&mut self, insert: &InsertStatement) -> Result<ExecResult> {
        let plan = Planner::new(self.db.catalog()).plan_insert(insert)?;
        let schema = self.db.catalog().get_table(&plan.table)?.clone();
        let before = self.db.storage(&plan.table)?.len();

        for (row, tuple) in insert.values.iter().enumerate() {
            if let Err(e) = self.insert_row(&schema, &plan, tuple, row) {
                self.db.storage_mut(&plan.table)?.truncate(before);
                tracing::debug!(table = %plan.table, row, error = %e, "insert rolled back");
                return Err(e);
            }
        }

        let inserted = insert.values.len();
        tracing::debug!(table = %plan.table, rows = inserted, "inserted rows");
        Ok(ExecResult::Inserted(inserted))
    }

    fn insert_row(
        &mut self,
        schema: &TableSchema,
        plan: &InsertPlan,
        tuple: &[Value],
        row: usize,
    ) -> Result<()> {
        if tuple.len() != plan.targets.len() {
            return Err(Error::ArityMismatch {
                table: plan.table.clone(),
                expected: plan.targets.len(),
                found: tuple.len(),
                row,
            });
        }

        // Unlisted columns are NULL
        let mut values = vec![Value::Null; plan.width];
        for (&idx, value) in plan.targets.iter().zip(tuple) {
            values[idx] = value.clone();
        }

        self.assign_row_id(schema, &mut values)?;

        let values = ConstraintEnforcer::new(self.db).validate_row(schema, values, row)?;
        self.db.storage_mut(&plan.table)?.insert(values);
        Ok(())
    }

    /// Number an omitted INTEGER PRIMARY KEY as max + 1. Without
    /// `auto_primary_key` only AUTOINCREMENT columns are numbered.
    fn assign_row_id(&self, schema: &TableSchema, values: &mut [Value]) -> Result<()> {
        let Some((idx, col)) = schema.primary_key() else {
            return Ok(());
        };
        if !col.is_row_id_alias() || !values[idx].is_null() {
            return Ok(());
        }
        if !self.db.config().auto_primary_key && !col.autoincrement {
            return Ok(());
        }

        let max = self
            .db
            .storage(schema.name())?
            .column_values(idx)
            .filter_map(|v| match v {
                Value::Integer(n) => Some(*n),
                _ => None,
            })
            .max();
        values[idx] = Value::Integer(max.map_or(1, |n| n.saturating_add(1)));
        Ok(())
    }

    fn execute_select(&mut self, select: &SelectStatement) -> Result<ExecResult> {
        let plan = Planner::new(self.db.catalog()).plan_select(select)?;

        let mut rows = self.execute_join(&plan)?;

        if let Some(filter) = &plan.filter {
            let before = rows.len();
            rows.retain(|row| filter.evaluate(row).is_true());
            tracing::trace!(before, after = rows.len(), "filtered rows");
        }

        let rows: Vec<Vec<Value>> = rows
            .into_iter()
            .map(|row| plan.projection.iter().map(|&i| row[i].clone()).collect())
            .collect();

        tracing::debug!(table = %plan.from, rows = rows.len(), "selected rows");
        Ok(ExecResult::Rows(ResultSet {
            columns: plan.columns,
            rows,
        }))
    }

    /// Nested-loop equality joins, left-row-major
    fn execute_join(&self, plan: &SelectPlan) -> Result<Vec<Vec<Value>>> {
        let mut rows: Vec<Vec<Value>> = self
            .db
            .storage(&plan.from)?
            .scan()
            .map(|row| row.values().to_vec())
            .collect();

        for join in &plan.joins {
            let right = self.db.storage(&join.table)?;
            let mut joined = Vec::new();

            for l_row in &rows {
                for r_row in right.scan() {
                    let r_values = r_row.values();
                    let lhs = combined_value(l_row, r_values, join.left);
                    let rhs = combined_value(l_row, r_values, join.right);
                    if lhs.sql_eq(rhs).is_true() {
                        let mut values = l_row.clone();
                        values.extend(r_values.iter().cloned());
                        joined.push(values);
                    }
                }
            }

            tracing::trace!(
                table = %join.table,
                left = rows.len(),
                right = right.len(),
                matched = joined.len(),
                "joined rows"
            );
            rows = joined;
        }

        Ok(rows)
    }
}

/// Value at `index` of the row `left ++ right`, without building it
fn combined_value<'r>(left: &'r [Value], right: &'r [Value], index: usize) -> &'r Value {
    match index.checked_sub(left.len()) {
        Some(i) => &right[i],
        None => &left[index],
    }
}
