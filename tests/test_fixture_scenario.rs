use anyhow::Result;
use tinyrel::{Database, Error, ExecResult, Value};
use tracing_subscriber::EnvFilter;

const FIXTURE: &str = r#"
-- Schema: users and their orders
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER,
    balance REAL,
    email TEXT UNIQUE
);

/* Orders reference users through a
   table-level foreign key */
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    amount REAL NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

INSERT INTO users (name, age, balance, email) VALUES
    ('Alice', 30, 1000.50, 'alice@example.com'),
    ('Bob', 25, 500.75, 'bob@example.com');

INSERT INTO orders (user_id, amount) VALUES
    (1, 250.00),
    (2, 125.50);
"#;

const QUERY: &str = "SELECT users.name, orders.amount
    FROM users JOIN orders ON users.id = orders.user_id
    WHERE users.age > 20 AND orders.amount < 300.00";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture_db() -> Result<Database> {
    init_tracing();
    let mut db = Database::new();
    let report = db.run_script(FIXTURE);
    if let Some(err) = report.errors().next() {
        return Err(err.clone().into());
    }
    Ok(db)
}

#[test]
fn test_fixture_query() -> Result<()> {
    let mut db = fixture_db()?;

    let result = db
        .execute_sql(QUERY)?
        .into_rows()
        .ok_or_else(|| anyhow::anyhow!("expected rows"))?;

    assert_eq!(result.columns, vec!["name", "amount"]);
    assert_eq!(
        result.rows,
        vec![
            vec![Value::from("Alice"), Value::Real(250.0)],
            vec![Value::from("Bob"), Value::Real(125.5)],
        ]
    );
    Ok(())
}

#[test]
fn test_fixture_result_as_json() -> Result<()> {
    let mut db = fixture_db()?;

    let result = db.execute_sql(QUERY)?;
    let json = serde_json::to_value(&result)?;
    assert_eq!(
        json,
        serde_json::json!({
            "Rows": {
                "columns": ["name", "amount"],
                "rows": [["Alice", 250.0], ["Bob", 125.5]]
            }
        })
    );
    Ok(())
}

#[test]
fn test_duplicate_email_rejected() -> Result<()> {
    let mut db = fixture_db()?;

    let err = db
        .execute_sql(
            "INSERT INTO users (name, age, balance, email) VALUES ('Mallory', 40, 0.0, 'bob@example.com')",
        )
        .unwrap_err();
    assert!(matches!(err, Error::UniqueViolation { ref column, .. } if column == "email"));
    assert_eq!(db.row_count("users")?, 2);
    Ok(())
}

#[test]
fn test_orphan_order_rejected() -> Result<()> {
    let mut db = fixture_db()?;

    let err = db
        .execute_sql("INSERT INTO orders (user_id, amount) VALUES (99, 10.0)")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ForeignKeyViolation { ref ref_table, ref value, .. } if ref_table == "users" && value == "99"
    ));
    assert_eq!(db.row_count("orders")?, 2);
    Ok(())
}

#[test]
fn test_rejected_rows_are_never_observable() -> Result<()> {
    let mut db = fixture_db()?;

    let attempts = [
        "INSERT INTO users (name, email) VALUES (NULL, 'carol@example.com')",
        "INSERT INTO users (id, name) VALUES (1, 'Carol')",
        "INSERT INTO users (name, email) VALUES ('Carol', 'carol@example.com'), ('Dave', 'alice@example.com')",
        "INSERT INTO orders (user_id, amount) VALUES (1, 5.0), (3, 6.0)",
        "INSERT INTO users (name, age) VALUES ('Carol', 'thirty')",
    ];
    for sql in attempts {
        assert!(db.execute_sql(sql).is_err(), "accepted: {}", sql);
    }

    let users = db
        .execute_sql("SELECT name FROM users")?
        .into_rows()
        .ok_or_else(|| anyhow::anyhow!("expected rows"))?;
    assert_eq!(
        users.rows,
        vec![vec![Value::from("Alice")], vec![Value::from("Bob")]]
    );
    assert_eq!(db.row_count("orders")?, 2);
    Ok(())
}

#[test]
fn test_inserted_counts() -> Result<()> {
    let mut db = fixture_db()?;
    let result = db.execute_sql(
        "INSERT INTO orders (user_id, amount) VALUES (1, 1.0), (1, 2.0), (2, 3.0);",
    )?;
    assert_eq!(result, ExecResult::Inserted(3));
    Ok(())
}
