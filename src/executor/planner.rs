//! Query Planner for tinyrel
//!
//! This module resolves names in parsed statements against the catalog
//! before any row is touched. A SELECT becomes a [`SelectPlan`] whose column
//! references are positions in the joined row; an INSERT becomes an
//! [`InsertPlan`] mapping each listed column to its schema position.

use crate::catalog::{Catalog, TableSchema};
use crate::error::{Error, Result};
use crate::sql::ast::*;

use super::eval::BoundExpr;

/// One column of the joined row
#[derive(Debug, Clone, PartialEq)]
struct ScopeColumn {
    table: String,
    column: String,
}

/// The columns visible to a query, in joined-row order
#[derive(Debug, Default)]
struct Scope {
    tables: Vec<String>,
    columns: Vec<ScopeColumn>,
}

impl Scope {
    fn push_table(&mut self, schema: &TableSchema) -> Result<()> {
        if self.tables.iter().any(|t| t == schema.name()) {
            return Err(Error::DuplicateTableReference(schema.name().to_string()));
        }
        self.tables.push(schema.name().to_string());
        self.columns
            .extend(schema.column_names().into_iter().map(|c| ScopeColumn {
                table: schema.name().to_string(),
                column: c.to_string(),
            }));
        Ok(())
    }

    fn resolve(&self, col: &ColumnRef) -> Result<usize> {
        match &col.table {
            Some(table) => {
                if !self.tables.contains(table) {
                    return Err(Error::TableNotFound(table.clone()));
                }
                self.columns
                    .iter()
                    .position(|c| &c.table == table && c.column == col.column)
                    .ok_or_else(|| Error::ColumnNotFound {
                        table: table.clone(),
                        column: col.column.clone(),
                    })
            }
            None => {
                let mut matches = self
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.column == col.column)
                    .map(|(i, _)| i);
                match (matches.next(), matches.next()) {
                    (Some(idx), None) => Ok(idx),
                    (Some(_), Some(_)) => Err(Error::AmbiguousColumn(col.column.clone())),
                    (None, _) => Err(Error::ColumnNotFound {
                        table: self.tables.join(", "),
                        column: col.column.clone(),
                    }),
                }
            }
        }
    }

    /// Bare column name, qualified when another table has the same name
    fn output_name(&self, idx: usize) -> String {
        let col = &self.columns[idx];
        let shared = self
            .columns
            .iter()
            .filter(|c| c.column == col.column)
            .count()
            > 1;
        if shared {
            format!("{}.{}", col.table, col.column)
        } else {
            col.column.clone()
        }
    }
}

/// An equality join step
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan {
    pub table: String,
    /// Positions compared in the combined (left + right) row
    pub left: usize,
    pub right: usize,
}

/// A fully resolved SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct SelectPlan {
    pub from: String,
    pub joins: Vec<JoinPlan>,
    pub filter: Option<BoundExpr>,
    /// Joined-row positions to output, in order
    pub projection: Vec<usize>,
    /// Output column names
    pub columns: Vec<String>,
}

/// A resolved INSERT column mapping
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    pub table: String,
    /// Schema position of each supplied value
    pub targets: Vec<usize>,
    /// Number of columns in the table
    pub width: usize,
}

/// Query planner
pub struct Planner<'a> {
    catalog: &'a Catalog,
}

impl<'a> Planner<'a> {
    /// Create a new planner
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn plan_select(&self, select: &SelectStatement) -> Result<SelectPlan> {
        let mut scope = Scope::default();
        scope.push_table(self.catalog.get_table(&select.from)?)?;

        let mut joins = Vec::with_capacity(select.joins.len());
        for join in &select.joins {
            scope.push_table(self.catalog.get_table(&join.table)?)?;
            joins.push(JoinPlan {
                table: join.table.clone(),
                left: scope.resolve(&join.left)?,
                right: scope.resolve(&join.right)?,
            });
        }

        let filter = select
            .where_clause
            .as_ref()
            .map(|expr| bind_expr(&scope, expr))
            .transpose()?;

        let mut projection = Vec::new();
        for item in &select.projections {
            match item {
                SelectItem::Wildcard => projection.extend(0..scope.columns.len()),
                SelectItem::QualifiedWildcard(table) => {
                    if !scope.tables.contains(table) {
                        return Err(Error::TableNotFound(table.clone()));
                    }
                    projection.extend(
                        scope
                            .columns
                            .iter()
                            .enumerate()
                            .filter(|(_, c)| &c.table == table)
                            .map(|(i, _)| i),
                    );
                }
                SelectItem::Column(col) => projection.push(scope.resolve(col)?),
            }
        }

        let columns = projection.iter().map(|&i| scope.output_name(i)).collect();

        Ok(SelectPlan {
            from: select.from.clone(),
            joins,
            filter,
            projection,
            columns,
        })
    }

    pub fn plan_insert(&self, insert: &InsertStatement) -> Result<InsertPlan> {
        let schema = self.catalog.get_table(&insert.table)?;

        let targets = match &insert.columns {
            None => (0..schema.column_count()).collect(),
            Some(columns) => {
                let mut targets: Vec<usize> = Vec::with_capacity(columns.len());
                for name in columns {
                    let idx = schema.column_index(name).ok_or_else(|| Error::ColumnNotFound {
                        table: insert.table.clone(),
                        column: name.clone(),
                    })?;
                    if targets.contains(&idx) {
                        return Err(Error::DuplicateColumn {
                            table: insert.table.clone(),
                            column: name.clone(),
                        });
                    }
                    targets.push(idx);
                }
                targets
            }
        };

        Ok(InsertPlan {
            table: insert.table.clone(),
            targets,
            width: schema.column_count(),
        })
    }
}

fn bind_expr(scope: &Scope, expr: &Expr) -> Result<BoundExpr> {
    Ok(match expr {
        Expr::Column(col) => BoundExpr::Column(scope.resolve(col)?),
        Expr::Literal(value) => BoundExpr::Literal(value.clone()),
        Expr::BinaryOp { left, op, right } => {
            let left = Box::new(bind_expr(scope, left)?);
            let right = Box::new(bind_expr(scope, right)?);
            match op {
                BinaryOperator::And => BoundExpr::And(left, right),
                BinaryOperator::Or => BoundExpr::Or(left, right),
                op => BoundExpr::Compare {
                    left,
                    op: *op,
                    right,
                },
            }
        }
    })
}
