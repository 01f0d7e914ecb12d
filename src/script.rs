//! Script runner
//!
//! Runs a script statement by statement. Each statement commits on its own;
//! a failure only discards the failing statement. The configured
//! [`ErrorPolicy`] decides whether the script goes on after a failure.

use crate::config::ErrorPolicy;
use crate::database::Database;
use crate::error::ScriptError;
use crate::executor::{ExecResult, ResultSet};
use crate::sql::{parse, split_statements};

/// Result of one statement of a script
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    /// Zero-based statement index
    pub index: usize,
    pub result: std::result::Result<ExecResult, ScriptError>,
}

/// Outcomes of a script run, in statement order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptReport {
    pub outcomes: Vec<StatementOutcome>,
}

impl ScriptReport {
    /// True when every executed statement succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Errors in statement order
    pub fn errors(&self) -> impl Iterator<Item = &ScriptError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Result sets of the queries in the script, in order
    pub fn result_sets(&self) -> impl Iterator<Item = &ResultSet> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(ExecResult::Rows(rows)) => Some(rows),
            _ => None,
        })
    }
}

/// Executes scripts against a database
pub struct ScriptRunner<'a> {
    db: &'a mut Database,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn run(&mut self, script: &str) -> ScriptReport {
        let policy = self.db.config().on_error;
        let mut report = ScriptReport::default();

        for (index, statement) in split_statements(script).enumerate() {
            let statement = match statement {
                Ok(statement) => statement,
                Err(source) => {
                    // The rest of the text cannot be split reliably
                    let err = ScriptError {
                        index,
                        offset: source.offset().unwrap_or(script.len()),
                        source,
                    };
                    tracing::warn!(index, error = %err.source, "script stopped by lexical error");
                    report.outcomes.push(StatementOutcome {
                        index,
                        result: Err(err),
                    });
                    break;
                }
            };

            let offset = statement.offset;
            let result = parse(statement.tokens).and_then(|stmt| {
                tracing::debug!(index, offset, statement = %stmt, "executing statement");
                self.db.execute(&stmt)
            });

            let failed = result.is_err();
            let result = result.map_err(|source| {
                tracing::warn!(index, offset, error = %source, "statement rejected");
                ScriptError {
                    index,
                    offset,
                    source,
                }
            });
            report.outcomes.push(StatementOutcome { index, result });

            if failed && policy == ErrorPolicy::Halt {
                break;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::Error;

    const SCRIPT: &str = "
        CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT UNIQUE);
        INSERT INTO t (v) VALUES ('a');
        INSERT INTO t (v) VALUES ('a');
        INSERT INTO t (v) VALUES ('b');
    ";

    #[test]
    fn test_halt_stops_at_first_error() {
        let mut db = Database::new();
        let report = db.run_script(SCRIPT);

        assert_eq!(report.outcomes.len(), 3);
        assert!(!report.is_success());
        let err = report.errors().next().unwrap();
        assert_eq!(err.index, 2);
        assert!(matches!(err.source, Error::UniqueViolation { .. }));
        assert_eq!(db.row_count("t").unwrap(), 1);
    }

    #[test]
    fn test_continue_runs_remaining_statements() {
        let mut db = Database::with_config(EngineConfig::new().on_error(ErrorPolicy::Continue));
        let report = db.run_script(SCRIPT);

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(db.row_count("t").unwrap(), 2);
    }

    #[test]
    fn test_lex_error_keeps_earlier_statements() {
        let mut db = Database::with_config(EngineConfig::new().on_error(ErrorPolicy::Continue));
        let report = db.run_script(
            "CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('x'); INSERT INTO t VALUES ('y",
        );

        assert_eq!(report.outcomes.len(), 3);
        let err = report.errors().next().unwrap();
        assert_eq!(err.index, 2);
        assert!(matches!(err.source, Error::UnterminatedString(_)));
        assert_eq!(db.row_count("t").unwrap(), 1);
    }

    #[test]
    fn test_syntax_error_carries_statement_offset() {
        let mut db = Database::new();
        let report = db.run_script("CREATE TABLE t (v TEXT); SELEC v FROM t;");

        let err = report.errors().next().unwrap();
        assert_eq!(err.index, 1);
        assert_eq!(err.offset, 25);
        assert_eq!(err.source.offset(), Some(25));
    }

    #[test]
    fn test_result_sets() {
        let mut db = Database::new();
        let report = db.run_script(
            "CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (1), (2); SELECT v FROM t WHERE v > 1",
        );

        assert!(report.is_success());
        let sets: Vec<_> = report.result_sets().collect();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].rows, vec![vec![crate::storage::Value::Integer(2)]]);
    }
}
