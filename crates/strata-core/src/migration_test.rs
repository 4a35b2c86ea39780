use super::*;

#[test]
fn status_display() {
    let expectations = [
        (Status::Ignored, "IGNORED"),
        (Status::Applied, "APPLIED"),
        (Status::Pending, "PENDING"),
        (Status::Error, "ERROR"),
        (Status::Invalid, "INVALID"),
    ];
    for (status, expected) in expectations {
        assert_eq!(status.to_string(), expected);
    }
}

#[test]
fn status_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Status::Invalid).unwrap(), "\"INVALID\"");
    assert_eq!(serde_json::to_string(&Status::Ignored).unwrap(), "\"IGNORED\"");
}

#[test]
fn sort_by_version_orders_ascending() {
    let mut migrations = vec![
        Migration::new(3, "third", "SELECT 3"),
        Migration::new(1, "first", "SELECT 1"),
        Migration::new(1.5, "between", "SELECT 1.5"),
    ];
    sort_by_version(&mut migrations);
    let versions: Vec<f64> = migrations.iter().map(|m| m.version.value()).collect();
    assert_eq!(versions, vec![1.0, 1.5, 3.0]);
}

#[test]
fn record_captures_script_checksum() {
    let migration = Migration::new(1, "create users", "CREATE TABLE users (id INT);");
    let record = MigrationRecord::applied(&migration, Duration::from_millis(3));

    assert_eq!(record.version, migration.version);
    assert_eq!(record.description, "create users");
    assert_eq!(record.checksum, compute_checksum("CREATE TABLE users (id INT);"));
    assert_eq!(record.execution_time, Duration::from_millis(3));
}

#[test]
fn info_json_omits_empty_fields() {
    let info = MigrationInfo::new(Status::Pending, Migration::new(2, "two", "SELECT 2"));
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["migration"]["version"], 2.0);
    assert!(json.get("applied_at").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn failed_info_carries_message() {
    let info = MigrationInfo::failed(Migration::new(1, "one", "bad"), "syntax error");
    assert_eq!(info.status, Status::Error);
    assert_eq!(info.error.as_deref(), Some("syntax error"));
}
