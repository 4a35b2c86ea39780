use super::*;
use strata_core::Migration;

fn record(version: f64, script: &str) -> MigrationRecord {
    MigrationRecord::applied(
        &Migration::new(version, format!("v{version}"), script),
        Duration::from_millis(7),
    )
}

#[tokio::test]
async fn test_in_memory() {
    let driver = DuckDbDriver::in_memory().unwrap();
    assert_eq!(driver.table(), "strata_migrations");
}

#[tokio::test]
async fn test_new_memory_path() {
    let driver = DuckDbDriver::new(":memory:").unwrap();
    driver.create_tracking_table().await.unwrap();
    assert!(driver.all_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_tracking_table_is_idempotent() {
    let driver = DuckDbDriver::in_memory().unwrap();
    driver.create_tracking_table().await.unwrap();
    driver.create_tracking_table().await.unwrap();
    assert!(driver.all_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_all_records_without_table_fails() {
    let driver = DuckDbDriver::in_memory().unwrap();
    assert!(driver.all_records().await.is_err());
}

#[tokio::test]
async fn test_insert_and_list_records() {
    let driver = DuckDbDriver::in_memory().unwrap();
    driver.create_tracking_table().await.unwrap();

    let second = record(2.0, "SELECT 2");
    let first = record(1.5, "SELECT 1");
    driver.insert_record(&second).await.unwrap();
    driver.insert_record(&first).await.unwrap();

    let records = driver.all_records().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].version, Version::new(1.5));
    assert_eq!(records[0].description, "v1.5");
    assert_eq!(records[0].checksum, first.checksum);
    assert_eq!(
        records[0].applied_at.timestamp_micros(),
        first.applied_at.timestamp_micros()
    );
    assert_eq!(records[0].execution_time, Duration::from_millis(7));
    assert_eq!(records[1].version, Version::new(2.0));
}

#[tokio::test]
async fn test_duplicate_record_rejected() {
    let driver = DuckDbDriver::in_memory().unwrap();
    driver.create_tracking_table().await.unwrap();
    driver.insert_record(&record(1.0, "SELECT 1")).await.unwrap();
    assert!(driver.insert_record(&record(1.0, "SELECT 1")).await.is_err());
}

#[tokio::test]
async fn test_execute_script_commits() {
    let driver = DuckDbDriver::in_memory().unwrap();
    driver
        .execute_script("CREATE TABLE users (id INT); INSERT INTO users VALUES (1), (2);")
        .await
        .unwrap();

    let conn = driver.lock().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_execute_script_rolls_back_on_failure() {
    let driver = DuckDbDriver::in_memory().unwrap();
    let result = driver
        .execute_script("CREATE TABLE half (id INT); SELECT * FROM no_such_table;")
        .await;
    assert!(matches!(result, Err(DbError::ExecutionError(_))));

    let conn = driver.lock().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'half'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_schema_qualified_table() {
    let driver = DuckDbDriver::in_memory()
        .unwrap()
        .with_table("audit.history")
        .unwrap();
    driver.create_tracking_table().await.unwrap();
    driver.insert_record(&record(1.0, "SELECT 1")).await.unwrap();
    assert_eq!(driver.all_records().await.unwrap().len(), 1);
}

#[test]
fn test_invalid_table_names_rejected() {
    for bad in ["", "1table", "a.b.c", "drop table x", "t;--", ".t", "s."] {
        let result = DuckDbDriver::in_memory().unwrap().with_table(bad);
        assert!(
            matches!(result, Err(DbError::InvalidIdentifier(_))),
            "should reject {bad:?}"
        );
    }
}

#[tokio::test]
async fn test_file_backed_history_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let driver = DuckDbDriver::from_path(&path).unwrap();
        driver.create_tracking_table().await.unwrap();
        driver.insert_record(&record(1.0, "SELECT 1")).await.unwrap();
    }
    let driver = DuckDbDriver::from_path(&path).unwrap();
    assert_eq!(driver.all_records().await.unwrap().len(), 1);
}

#[test]
fn test_decode_rejects_negative_execution_time() {
    let result = decode_record(1.0, "d".into(), "c".into(), 0, -5);
    assert!(matches!(result, Err(DbError::CorruptRecord { .. })));
}

#[tokio::test]
async fn test_tracking_table_exists() {
    let driver = DuckDbDriver::in_memory().unwrap();
    assert!(!driver.tracking_table_exists().await.unwrap());
    driver.create_tracking_table().await.unwrap();
    assert!(driver.tracking_table_exists().await.unwrap());
}

#[tokio::test]
async fn test_tracking_table_exists_schema_qualified() {
    let driver = DuckDbDriver::in_memory()
        .unwrap()
        .with_table("audit.history")
        .unwrap();
    assert!(!driver.tracking_table_exists().await.unwrap());
    driver.create_tracking_table().await.unwrap();
    assert!(driver.tracking_table_exists().await.unwrap());

    let other = DuckDbDriver::in_memory().unwrap();
    other.execute_script("CREATE TABLE history (id INT);").await.unwrap();
    let other = other.with_table("audit.history").unwrap();
    assert!(!other.tracking_table_exists().await.unwrap());
}

#[tokio::test]
async fn test_script_with_own_commit_fails_after_committing() {
    let driver = DuckDbDriver::in_memory().unwrap();
    let result = driver
        .execute_script("CREATE TABLE early (id INT); COMMIT;")
        .await;
    assert!(matches!(result, Err(DbError::ExecutionError(_))));

    let conn = driver.lock().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'early'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_script_with_own_begin_fails() {
    let driver = DuckDbDriver::in_memory().unwrap();
    let result = driver
        .execute_script("BEGIN TRANSACTION; CREATE TABLE nested (id INT);")
        .await;
    assert!(result.is_err());
}
