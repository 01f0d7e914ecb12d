//! Query execution module
//!
//! This module contains the planner, the predicate evaluator and the
//! executor.

pub mod eval;
pub mod executor;
pub mod planner;

pub use eval::BoundExpr;
pub use executor::{ExecResult, ExecutionEngine, ResultSet};
pub use planner::{InsertPlan, JoinPlan, Planner, SelectPlan};
