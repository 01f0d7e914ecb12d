//! SQL Abstract Syntax Tree (AST)
//!
//! This module defines the AST nodes for the three supported statements.
//! `Display` renders each node back as canonical SQL.

use crate::catalog::ColumnDefinition;
use crate::storage::Value;
use std::fmt;

/// A SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// INSERT statement
    Insert(InsertStatement),
    /// SELECT statement
    Select(SelectStatement),
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// `IF NOT EXISTS`: an existing table is left alone
    pub if_not_exists: bool,
    /// Database schema prefix (`main.t`)
    pub schema: Option<String>,
    /// Table name
    pub name: String,
    /// Column definitions, with table-level clauses already folded in
    pub columns: Vec<ColumnDefinition>,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name
    pub table: String,
    /// Column names; `None` means every column in schema order
    pub columns: Option<Vec<String>>,
    /// Literal tuples to insert
    pub values: Vec<Vec<Value>>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Select list
    pub projections: Vec<SelectItem>,
    /// FROM table
    pub from: String,
    /// JOIN clauses, in written order
    pub joins: Vec<Join>,
    /// WHERE clause
    pub where_clause: Option<Expr>,
}

/// A single item in the SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// All columns (*)
    Wildcard,
    /// A table's all columns (table.*)
    QualifiedWildcard(String),
    /// A column reference
    Column(ColumnRef),
}

/// Equality JOIN clause: `JOIN table ON left = right`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Table to join
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// WHERE expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(ColumnRef),
    /// Literal value
    Literal(Value),
    /// Binary operation
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Table name (optional)
    pub table: Option<String>,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: Option<&str>, column: &str) -> Self {
        Self {
            table: table.map(str::to_string),
            column: column.to_string(),
        }
    }

    pub fn qualified(table: &str, column: &str) -> Self {
        Self::new(Some(table), column)
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
}

impl BinaryOperator {
    /// Get the precedence of this operator (higher = binds tighter)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Neq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gte => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

impl Expr {
    fn fmt_with_parent(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        match self {
            Expr::Column(col) => write!(f, "{}", col),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::BinaryOp { left, op, right } => {
                let prec = op.precedence();
                let wrap = prec < parent;
                if wrap {
                    write!(f, "(")?;
                }
                left.fmt_with_parent(f, prec)?;
                write!(f, " {} ", op)?;
                // Operators are left-associative, so an equal-precedence right
                // child needs parentheses to survive a round trip
                right.fmt_with_parent(f, prec + 1)?;
                if wrap {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_parent(f, 0)
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Wildcard => write!(f, "*"),
            SelectItem::QualifiedWildcard(table) => write!(f, "{}.*", table),
            SelectItem::Column(col) => write!(f, "{}", col),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(ct) => {
                write!(f, "CREATE TABLE ")?;
                if ct.if_not_exists {
                    write!(f, "IF NOT EXISTS ")?;
                }
                if let Some(schema) = &ct.schema {
                    write!(f, "{}.", schema)?;
                }
                write!(f, "{} (", ct.name)?;
                write_list(f, &ct.columns)?;
                write!(f, ")")
            }
            Statement::Insert(ins) => {
                write!(f, "INSERT INTO {}", ins.table)?;
                if let Some(columns) = &ins.columns {
                    write!(f, " (")?;
                    write_list(f, columns)?;
                    write!(f, ")")?;
                }
                write!(f, " VALUES ")?;
                for (i, row) in ins.values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "(")?;
                    write_list(f, row)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            Statement::Select(sel) => {
                write!(f, "SELECT ")?;
                write_list(f, &sel.projections)?;
                write!(f, " FROM {}", sel.from)?;
                for join in &sel.joins {
                    write!(f, " JOIN {} ON {} = {}", join.table, join.left, join.right)?;
                }
                if let Some(expr) = &sel.where_clause {
                    write!(f, " WHERE {}", expr)?;
                }
                Ok(())
            }
        }
    }
}
