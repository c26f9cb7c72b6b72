//! Write path tests: batching, upserts and transaction behavior over
//! the in-memory backend.

use tabula_rdbc::prelude::*;

fn people(rows: &[(i64, &str)]) -> DataFrame {
    let mut id = Column::new("id", SemanticType::Int64).unwrap();
    let mut name = Column::new("name", SemanticType::Utf8).unwrap();
    for (i, n) in rows {
        id.push(Value::Int64(*i)).unwrap();
        name.push(Value::Utf8((*n).into())).unwrap();
    }
    DataFrame::new(vec![id, name])
        .unwrap()
        .with_name("people")
        .with_primary_key(vec!["id".to_string()])
}

async fn setup(frame: &DataFrame) -> (MemoryDb, MemoryConnection, TypeRegistry) {
    let db = MemoryDb::new();
    let conn = db.connect();
    let registry = TypeRegistry::default();
    ensure_table(&conn, &registry, frame, &WriteOptions::new())
        .await
        .unwrap();
    (db, conn, registry)
}

// ==================== Upsert Tests ====================

#[tokio::test]
async fn test_upsert_is_stable_and_updates() {
    let frame = people(&[(1, "ada"), (2, "grace"), (3, "edsger")]);
    let (db, conn, registry) = setup(&frame).await;
    let options = WriteOptions::new().with_upsert(true);

    assert_eq!(
        write_dataset(&conn, &frame, &registry, &options).await.unwrap(),
        3
    );
    assert_eq!(db.row_count("people"), Some(3));

    // Same keys again: the row count must not move, the values must.
    let update = people(&[(2, "hopper"), (4, "barbara")]);
    assert_eq!(
        write_dataset(&conn, &update, &registry, &options).await.unwrap(),
        2
    );
    assert_eq!(db.row_count("people"), Some(4));

    let back = read_dataset(
        &conn,
        "SELECT * FROM people ORDER BY id",
        &registry,
        &ReadOptions::new(),
    )
    .await
    .unwrap();
    assert_eq!(
        back.column("name").unwrap().to_options(),
        vec![
            Some(Value::Utf8("ada".into())),
            Some(Value::Utf8("hopper".into())),
            Some(Value::Utf8("edsger".into())),
            Some(Value::Utf8("barbara".into())),
        ]
    );
}

#[tokio::test]
async fn test_upsert_without_primary_key_fails() {
    let frame = people(&[(1, "ada")]);
    let (_db, conn, registry) = setup(&frame).await;
    let stripped = DataFrame::new(frame.columns().to_vec())
        .unwrap()
        .with_name("people");

    let err = write_dataset(
        &conn,
        &stripped,
        &registry,
        &WriteOptions::new().with_upsert(true),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::MissingPrimaryKey { .. }));
}

#[tokio::test]
async fn test_upsert_key_not_in_frame_fails() {
    let frame = people(&[(1, "ada")]);
    let (_db, conn, registry) = setup(&frame).await;
    let options = WriteOptions::new()
        .with_upsert(true)
        .with_primary_key(vec!["nope".to_string()]);

    let err = write_dataset(&conn, &frame, &registry, &options).await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn test_plain_insert_duplicate_key_rolls_back() {
    let frame = people(&[(1, "ada"), (2, "grace")]);
    let (db, conn, registry) = setup(&frame).await;
    conn.set_auto_commit(false).await.unwrap();
    let options = WriteOptions::new();

    write_dataset(&conn, &frame, &registry, &options).await.unwrap();
    assert_eq!(db.row_count("people"), Some(2));

    let err = write_dataset(&conn, &frame, &registry, &options).await.unwrap_err();
    assert!(err.to_string().contains("statement error"));
    assert_eq!(db.row_count("people"), Some(2), "failed write left no rows");
}

// ==================== Batching Tests ====================

fn numbered(n: i64) -> DataFrame {
    let mut id = Column::new("id", SemanticType::Int64).unwrap();
    for i in 0..n {
        id.push(Value::Int64(i)).unwrap();
    }
    DataFrame::new(vec![id]).unwrap().with_name("numbers")
}

#[tokio::test]
async fn test_batch_flush_counts() {
    let frame = numbered(10);
    let (db, conn, registry) = setup(&frame).await;

    let before = db.batch_executions();
    write_dataset(
        &conn,
        &frame,
        &registry,
        &WriteOptions::new().with_batch_size(3),
    )
    .await
    .unwrap();
    assert_eq!(db.batch_executions() - before, 4, "3+3+3+1 rows");
    assert_eq!(db.row_count("numbers"), Some(10));
}

#[tokio::test]
async fn test_batch_size_zero_flushes_once() {
    let frame = numbered(10);
    let (db, conn, registry) = setup(&frame).await;

    let before = db.batch_executions();
    write_dataset(
        &conn,
        &frame,
        &registry,
        &WriteOptions::new().with_batch_size(0),
    )
    .await
    .unwrap();
    assert_eq!(db.batch_executions() - before, 1);
    assert_eq!(db.row_count("numbers"), Some(10));
}

#[tokio::test]
async fn test_batch_larger_than_frame_flushes_once() {
    let frame = numbered(10);
    let (db, conn, registry) = setup(&frame).await;

    let before = db.batch_executions();
    write_dataset(
        &conn,
        &frame,
        &registry,
        &WriteOptions::new().with_batch_size(64),
    )
    .await
    .unwrap();
    assert_eq!(db.batch_executions() - before, 1);
}

#[tokio::test]
async fn test_empty_frame_touches_nothing() {
    let frame = numbered(0);
    let (db, conn, registry) = setup(&frame).await;

    let statements = db.statement_log().len();
    let written = write_dataset(&conn, &frame, &registry, &WriteOptions::new())
        .await
        .unwrap();
    assert_eq!(written, 0);
    assert_eq!(db.statement_log().len(), statements, "no statements ran");
}

// ==================== Transaction Tests ====================

#[tokio::test]
async fn test_mid_write_failure_rolls_back() {
    let seedframe = people(&[(100, "pre"), (101, "existing")]);
    let (db, conn, registry) = setup(&seedframe).await;
    conn.set_auto_commit(false).await.unwrap();
    write_dataset(&conn, &seedframe, &registry, &WriteOptions::new())
        .await
        .unwrap();
    assert_eq!(db.row_count("people"), Some(2));

    // The second flush of the next write dies.
    db.fail_batch_execution(db.batch_executions() + 2, "disk full");
    let incoming = people(&[
        (1, "a"),
        (2, "b"),
        (3, "c"),
        (4, "d"),
        (5, "e"),
        (6, "f"),
    ]);
    let err = write_dataset(
        &conn,
        &incoming,
        &registry,
        &WriteOptions::new().with_batch_size(3),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("disk full"));
    assert!(err.sql().unwrap_or_default().starts_with("INSERT INTO people"));
    assert_eq!(
        db.row_count("people"),
        Some(2),
        "rows from the first flush were rolled back"
    );
}

/// With implicit commit on there is no transaction to roll back, so a
/// mid-write failure leaves the earlier flushes applied.
#[tokio::test]
async fn test_auto_commit_failure_is_not_atomic() {
    let frame = numbered(10);
    let (db, conn, registry) = setup(&frame).await;
    assert!(conn.auto_commit());

    db.fail_batch_execution(db.batch_executions() + 3, "disk full");
    let err = write_dataset(
        &conn,
        &frame,
        &registry,
        &WriteOptions::new().with_batch_size(3),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert_eq!(db.row_count("numbers"), Some(6), "two flushes had landed");
}

#[tokio::test]
async fn test_failed_write_closes_statement() {
    let frame = numbered(10);
    let (db, conn, registry) = setup(&frame).await;

    write_dataset(&conn, &frame, &registry, &WriteOptions::new())
        .await
        .unwrap();
    assert_eq!(db.open_statements(), 0);

    db.fail_batch_execution(db.batch_executions() + 1, "disk full");
    let err = write_dataset(&conn, &frame, &registry, &WriteOptions::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert_eq!(
        db.open_statements(),
        0,
        "failed write released its statement"
    );
}

// ==================== Statement Helper Tests ====================

#[tokio::test]
async fn test_execute_update_commits() {
    let frame = numbered(3);
    let (db, conn, registry) = setup(&frame).await;
    write_dataset(&conn, &frame, &registry, &WriteOptions::new())
        .await
        .unwrap();

    execute_update(&conn, "DROP TABLE numbers").await.unwrap();
    assert!(!db.has_table("numbers"));
}

#[tokio::test]
async fn test_execute_update_attaches_sql_on_failure() {
    let frame = numbered(1);
    let (_db, conn, registry) = setup(&frame).await;
    write_dataset(&conn, &frame, &registry, &WriteOptions::new())
        .await
        .unwrap();

    let err = execute_update(&conn, "DELETE FROM numbers").await.unwrap_err();
    assert_eq!(err.sql(), Some("DELETE FROM numbers"));
}
