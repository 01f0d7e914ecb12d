//! Constraint enforcement
//!
//! Two checkpoints: [`ConstraintEnforcer::check_schema`] runs once when a
//! table is registered, and [`ConstraintEnforcer::validate_row`] runs for
//! every candidate row before it is stored.

use super::catalog::Catalog;
use super::schema::{ColumnDefinition, ForeignKey, TableSchema};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::storage::Value;

/// Validates schemas and candidate rows against declared constraints
pub struct ConstraintEnforcer<'a> {
    db: &'a Database,
    promote_integers: bool,
}

impl<'a> ConstraintEnforcer<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            promote_integers: db.config().promote_integers,
        }
    }

    /// Check a schema before registration: at most one primary key,
    /// AUTOINCREMENT only on an INTEGER PRIMARY KEY, and every foreign key
    /// targets a key column of a known table. A table may reference its own
    /// key columns.
    pub fn check_schema(catalog: &Catalog, schema: &TableSchema) -> Result<()> {
        if schema.columns().filter(|c| c.primary_key).count() > 1 {
            return Err(Error::MultiplePrimaryKeys(schema.name().to_string()));
        }

        if let Some(col) = schema
            .columns()
            .find(|c| c.autoincrement && !c.is_row_id_alias())
        {
            return Err(Error::InvalidAutoincrement {
                table: schema.name().to_string(),
                column: col.name.clone(),
            });
        }

        for col in schema.columns() {
            let Some(fk) = &col.references else {
                continue;
            };
            let dangling = |reason: &str| Error::DanglingForeignKey {
                table: schema.name().to_string(),
                column: col.name.clone(),
                ref_table: fk.table.clone(),
                ref_column: fk.column.clone(),
                reason: reason.to_string(),
            };

            let target_table = if fk.table == schema.name() {
                schema
            } else {
                catalog
                    .get_table(&fk.table)
                    .map_err(|_| dangling("table does not exist"))?
            };
            let target = target_table
                .column(&fk.column)
                .ok_or_else(|| dangling("column does not exist"))?;
            if !target.is_key() {
                return Err(dangling("column is neither PRIMARY KEY nor UNIQUE"));
            }
        }

        Ok(())
    }

    /// Validate a full candidate row for `schema` and return it with values
    /// coerced to the declared column types.
    ///
    /// Checks run in a fixed order: arity and types, NOT NULL, uniqueness,
    /// foreign keys. The first violation is returned.
    pub fn validate_row(
        &self,
        schema: &TableSchema,
        values: Vec<Value>,
        row: usize,
    ) -> Result<Vec<Value>> {
        if values.len() != schema.column_count() {
            return Err(Error::ArityMismatch {
                table: schema.name().to_string(),
                expected: schema.column_count(),
                found: values.len(),
                row,
            });
        }

        let values = schema
            .columns()
            .zip(values)
            .map(|(col, value)| self.check_type(schema, col, value))
            .collect::<Result<Vec<_>>>()?;

        for (col, value) in schema.columns().zip(&values) {
            if col.rejects_null() && value.is_null() {
                return Err(Error::NotNullViolation {
                    table: schema.name().to_string(),
                    column: col.name.clone(),
                });
            }
        }

        let stored = self.db.storage(schema.name())?;
        for (idx, (col, value)) in schema.columns().zip(&values).enumerate() {
            if !col.is_key() || value.is_null() {
                continue;
            }
            if stored.column_values(idx).any(|v| v.sql_eq(value).is_true()) {
                return Err(Error::UniqueViolation {
                    table: schema.name().to_string(),
                    column: col.name.clone(),
                    value: value.to_string(),
                });
            }
        }

        for (col, value) in schema.columns().zip(&values) {
            if let Some(fk) = &col.references {
                if !value.is_null() {
                    self.check_reference(schema, &values, col, fk, value)?;
                }
            }
        }

        Ok(values)
    }

    fn check_type(
        &self,
        schema: &TableSchema,
        col: &ColumnDefinition,
        value: Value,
    ) -> Result<Value> {
        let found = value.type_name();
        col.data_type
            .coerce(value, self.promote_integers)
            .ok_or_else(|| Error::TypeMismatch {
                table: schema.name().to_string(),
                column: col.name.clone(),
                expected: col.data_type.to_string(),
                found: found.to_string(),
            })
    }

    fn check_reference(
        &self,
        schema: &TableSchema,
        candidate: &[Value],
        col: &ColumnDefinition,
        fk: &ForeignKey,
        value: &Value,
    ) -> Result<()> {
        let target = self.db.catalog().get_table(&fk.table)?;
        let target_idx = target
            .column_index(&fk.column)
            .ok_or_else(|| Error::ColumnNotFound {
                table: fk.table.clone(),
                column: fk.column.clone(),
            })?;

        // A self-referencing row may point at itself
        if fk.table == schema.name() && candidate[target_idx].sql_eq(value).is_true() {
            return Ok(());
        }

        let found = self
            .db
            .storage(&fk.table)?
            .column_values(target_idx)
            .any(|v| v.sql_eq(value).is_true());

        if found {
            Ok(())
        } else {
            Err(Error::ForeignKeyViolation {
                table: schema.name().to_string(),
                column: col.name.clone(),
                ref_table: fk.table.clone(),
                ref_column: fk.column.clone(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn users() -> TableSchema {
        TableSchema::from_columns(
            "users",
            vec![
                ColumnDefinition::new("id", DataType::Integer).primary_key(true),
                ColumnDefinition::new("name", DataType::Text).not_null(true),
                ColumnDefinition::new("email", DataType::Text).unique(true),
            ],
        )
        .unwrap()
    }

    fn orders() -> TableSchema {
        TableSchema::from_columns(
            "orders",
            vec![
                ColumnDefinition::new("id", DataType::Integer).primary_key(true),
                ColumnDefinition::new("user_id", DataType::Integer).references("users", "id"),
                ColumnDefinition::new("amount", DataType::Real),
            ],
        )
        .unwrap()
    }

    fn db_with_alice() -> Database {
        let mut db = Database::new();
        db.create_table(users()).unwrap();
        db.create_table(orders()).unwrap();
        db.storage_mut("users")
            .unwrap()
            .insert(vec![Value::Integer(1), "Alice".into(), "alice@example.com".into()]);
        db
    }

    #[test]
    fn test_check_schema_rejects_forward_reference() {
        let catalog = Catalog::new();
        let err = ConstraintEnforcer::check_schema(&catalog, &orders()).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingForeignKey { ref ref_table, .. } if ref_table == "users"
        ));
    }

    #[test]
    fn test_check_schema_rejects_missing_column() {
        let mut catalog = Catalog::new();
        catalog.register_table(users()).unwrap();

        let schema = TableSchema::from_columns(
            "notes",
            vec![ColumnDefinition::new("author", DataType::Integer).references("users", "nope")],
        )
        .unwrap();
        let err = ConstraintEnforcer::check_schema(&catalog, &schema).unwrap_err();
        assert_eq!(
            err,
            Error::DanglingForeignKey {
                table: "notes".to_string(),
                column: "author".to_string(),
                ref_table: "users".to_string(),
                ref_column: "nope".to_string(),
                reason: "column does not exist".to_string(),
            }
        );
    }

    #[test]
    fn test_check_schema_rejects_misplaced_autoincrement() {
        let schema = TableSchema::from_columns(
            "t",
            vec![ColumnDefinition::new("n", DataType::Integer).autoincrement(true)],
        )
        .unwrap();
        assert!(matches!(
            ConstraintEnforcer::check_schema(&Catalog::new(), &schema),
            Err(Error::InvalidAutoincrement { ref column, .. }) if column == "n"
        ));
    }

    #[test]
    fn test_check_schema_requires_key_target() {
        let mut catalog = Catalog::new();
        catalog.register_table(users()).unwrap();

        let schema = TableSchema::from_columns(
            "notes",
            vec![ColumnDefinition::new("author", DataType::Text).references("users", "name")],
        )
        .unwrap();
        let err = ConstraintEnforcer::check_schema(&catalog, &schema).unwrap_err();
        assert!(matches!(err, Error::DanglingForeignKey { ref reason, .. } if reason.contains("neither")));
    }

    #[test]
    fn test_check_schema_allows_self_reference() {
        let schema = TableSchema::from_columns(
            "staff",
            vec![
                ColumnDefinition::new("id", DataType::Integer).primary_key(true),
                ColumnDefinition::new("manager", DataType::Integer).references("staff", "id"),
            ],
        )
        .unwrap();
        assert!(ConstraintEnforcer::check_schema(&Catalog::new(), &schema).is_ok());
    }

    #[test]
    fn test_multiple_primary_keys() {
        let schema = TableSchema::from_columns(
            "t",
            vec![
                ColumnDefinition::new("a", DataType::Integer).primary_key(true),
                ColumnDefinition::new("b", DataType::Integer).primary_key(true),
            ],
        )
        .unwrap();
        assert_eq!(
            ConstraintEnforcer::check_schema(&Catalog::new(), &schema).unwrap_err(),
            Error::MultiplePrimaryKeys("t".to_string())
        );
    }

    #[test]
    fn test_validate_row_order_of_checks() {
        let db = db_with_alice();
        let enforcer = ConstraintEnforcer::new(&db);
        let schema = db.catalog().get_table("users").unwrap();

        // Type mismatch is reported before the NULL name
        let err = enforcer
            .validate_row(schema, vec![Value::Real(2.5), Value::Null, Value::Null], 0)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref column, .. } if column == "id"));

        // NOT NULL is reported before the duplicate email
        let err = enforcer
            .validate_row(
                schema,
                vec![Value::Integer(2), Value::Null, "alice@example.com".into()],
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotNullViolation { .. }));

        let err = enforcer
            .validate_row(
                schema,
                vec![Value::Integer(2), "Eve".into(), "alice@example.com".into()],
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::UniqueViolation { ref column, .. } if column == "email"));
    }

    #[test]
    fn test_null_never_collides() {
        let mut db = db_with_alice();
        db.storage_mut("users")
            .unwrap()
            .insert(vec![Value::Integer(2), "Bob".into(), Value::Null]);

        let enforcer = ConstraintEnforcer::new(&db);
        let schema = db.catalog().get_table("users").unwrap();
        assert!(enforcer
            .validate_row(schema, vec![Value::Integer(3), "Carol".into(), Value::Null], 0)
            .is_ok());
    }

    #[test]
    fn test_foreign_key() {
        let db = db_with_alice();
        let enforcer = ConstraintEnforcer::new(&db);
        let schema = db.catalog().get_table("orders").unwrap();

        let row = enforcer
            .validate_row(schema, vec![Value::Integer(1), Value::Integer(1), Value::Integer(250)], 0)
            .unwrap();
        assert_eq!(row[2], Value::Real(250.0));

        assert!(enforcer
            .validate_row(schema, vec![Value::Integer(2), Value::Null, 10.5.into()], 0)
            .is_ok());

        let err = enforcer
            .validate_row(schema, vec![Value::Integer(3), Value::Integer(9), 10.5.into()], 0)
            .unwrap_err();
        assert!(matches!(err, Error::ForeignKeyViolation { ref value, .. } if value == "9"));
    }
}
