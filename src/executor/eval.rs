//! Three-valued predicate evaluation
//!
//! WHERE clauses are bound by the planner into [`BoundExpr`], where column
//! references are positions in the joined row. Evaluation never fails: any
//! comparison that touches NULL, or mixes TEXT with a number, is unknown.

use std::cmp::Ordering;

use crate::sql::BinaryOperator;
use crate::storage::{Truth, Value};

/// A predicate with its column references resolved to row positions
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Column(usize),
    Literal(Value),
    Compare {
        left: Box<BoundExpr>,
        op: BinaryOperator,
        right: Box<BoundExpr>,
    },
    And(Box<BoundExpr>, Box<BoundExpr>),
    Or(Box<BoundExpr>, Box<BoundExpr>),
}

impl BoundExpr {
    /// Evaluate as a predicate over a joined row
    pub fn evaluate(&self, row: &[Value]) -> Truth {
        match self {
            BoundExpr::And(left, right) => left.evaluate(row).and(right.evaluate(row)),
            BoundExpr::Or(left, right) => left.evaluate(row).or(right.evaluate(row)),
            BoundExpr::Compare { left, op, right } => {
                match (left.operand(row), right.operand(row)) {
                    (Some(l), Some(r)) => compare(l, *op, r),
                    _ => Truth::Unknown,
                }
            }
            // A bare operand is not a condition
            BoundExpr::Column(_) | BoundExpr::Literal(_) => Truth::Unknown,
        }
    }

    fn operand<'r>(&'r self, row: &'r [Value]) -> Option<&'r Value> {
        match self {
            BoundExpr::Column(idx) => row.get(*idx),
            BoundExpr::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Apply a comparison operator under three-valued logic
pub fn compare(left: &Value, op: BinaryOperator, right: &Value) -> Truth {
    let Some(ord) = left.compare(right) else {
        return Truth::Unknown;
    };

    let holds = match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::Neq => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::Lte => ord != Ordering::Greater,
        BinaryOperator::Gte => ord != Ordering::Less,
        BinaryOperator::And | BinaryOperator::Or => return Truth::Unknown,
    };
    Truth::from(holds)
}
