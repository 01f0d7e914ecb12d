use anyhow::Result;
use tinyrel::sql::{tokenize, TokenKind};
use tinyrel::{Database, EngineConfig, ErrorCategory, ErrorPolicy, ResultSet, Value};

fn rows(db: &mut Database, sql: &str) -> Result<ResultSet> {
    db.execute_sql(sql)?
        .into_rows()
        .ok_or_else(|| anyhow::anyhow!("expected rows for {}", sql))
}

fn token_stream(sql: &str) -> Result<Vec<(TokenKind, String)>> {
    Ok(tokenize(sql)?
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| (t.kind, t.lexeme))
        .collect())
}

#[test]
fn test_comment_transparency() -> Result<()> {
    let commented = "SELECT a, -- first column\n b /* second, with ; inside */ FROM t\n-- trailing\nWHERE a >= -1.5;";
    let stripped = "SELECT a, \n b  FROM t\n\nWHERE a >= -1.5;";

    assert_eq!(token_stream(commented)?, token_stream(stripped)?);
    Ok(())
}

#[test]
fn test_write_read_consistency() -> Result<()> {
    let mut db = Database::new();
    db.execute_sql("CREATE TABLE items (sku TEXT PRIMARY KEY, qty INTEGER, price REAL)")?;

    let inserted = vec![
        vec![Value::from("b-2"), Value::Integer(3), Value::Real(1.25)],
        vec![Value::from("a-1"), Value::Null, Value::Real(0.5)],
        vec![Value::from("c-3"), Value::Integer(-7), Value::Null],
    ];
    db.execute_sql(
        "INSERT INTO items (sku, qty, price) VALUES ('b-2', 3, 1.25), ('a-1', NULL, 0.5), ('c-3', -7, NULL)",
    )?;

    let result = rows(&mut db, "SELECT * FROM items")?;
    assert_eq!(result.columns, vec!["sku", "qty", "price"]);
    assert_eq!(result.rows, inserted);
    Ok(())
}

#[test]
fn test_join_cardinality_matches_pair_count() -> Result<()> {
    let mut db = Database::new();
    let report = db.run_script(
        "CREATE TABLE a (k INTEGER, tag TEXT);
         CREATE TABLE b (k INTEGER, note TEXT);
         INSERT INTO a VALUES (1, 'x'), (2, 'y'), (2, 'z'), (NULL, 'n'), (4, 'w');
         INSERT INTO b VALUES (2, 'p'), (1, 'q'), (2, 'r'), (NULL, 's'), (3, 't');",
    );
    assert!(report.is_success());

    let left = rows(&mut db, "SELECT * FROM a")?;
    let right = rows(&mut db, "SELECT * FROM b")?;
    let expected = left
        .rows
        .iter()
        .flat_map(|l| right.rows.iter().map(move |r| (l, r)))
        .filter(|(l, r)| l[0].sql_eq(&r[0]).is_true())
        .count();

    let joined = rows(&mut db, "SELECT tag, note FROM a JOIN b ON a.k = b.k")?;
    assert_eq!(joined.len(), expected);
    assert_eq!(expected, 5);
    assert_eq!(
        joined.rows[1..3],
        [
            vec![Value::from("y"), Value::from("p")],
            vec![Value::from("y"), Value::from("r")],
        ]
    );
    Ok(())
}

#[test]
fn test_three_table_join_qualifies_ambiguous_names() -> Result<()> {
    let mut db = Database::new();
    let report = db.run_script(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE orders (id INTEGER PRIMARY KEY,
             user_id INTEGER REFERENCES users(id),
             product_id INTEGER REFERENCES products(id));
         INSERT INTO users (name) VALUES ('Alice'), ('Bob');
         INSERT INTO products (name) VALUES ('Lamp');
         INSERT INTO orders (user_id, product_id) VALUES (2, 1);
         SELECT users.name, products.name FROM orders
             JOIN users ON orders.user_id = users.id
             JOIN products ON orders.product_id = products.id;",
    );
    assert!(report.is_success());

    let result = report
        .result_sets()
        .next()
        .ok_or_else(|| anyhow::anyhow!("expected rows"))?;
    assert_eq!(result.columns, vec!["users.name", "products.name"]);
    assert_eq!(
        result.rows,
        vec![vec![Value::from("Bob"), Value::from("Lamp")]]
    );
    Ok(())
}

#[test]
fn test_integer_promotion_can_be_disabled() -> Result<()> {
    let mut db = Database::with_config(EngineConfig::new().promote_integers(false));
    db.execute_sql("CREATE TABLE m (v REAL)")?;

    let err = db.execute_sql("INSERT INTO m VALUES (1)").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Constraint);
    db.execute_sql("INSERT INTO m VALUES (1.0)")?;
    assert_eq!(db.row_count("m")?, 1);
    Ok(())
}

#[test]
fn test_script_errors_carry_statement_context() -> Result<()> {
    let mut db = Database::with_config(EngineConfig::new().on_error(ErrorPolicy::Continue));
    let report = db.run_script(
        "CREATE TABLE t (id INTEGER PRIMARY KEY);
         CREATE TABLE t (id INTEGER);
         CREATE TABLE u (t_id INTEGER REFERENCES missing(id));
         INSERT INTO t VALUES (1), (1);
         INSERT INTO t VALUES (2);",
    );

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors.iter().map(|e| e.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(errors
        .iter()
        .map(|e| e.source.category())
        .eq([
            ErrorCategory::Schema,
            ErrorCategory::Schema,
            ErrorCategory::Constraint
        ]));
    assert!(errors[0].to_string().starts_with("statement #1"));
    assert_eq!(db.row_count("t")?, 1);
    Ok(())
}
