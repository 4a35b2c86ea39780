//! Integration tests for the strata binary

use std::path::Path;
use std::process::Command;

fn strata_bin() -> String {
    env!("CARGO_BIN_EXE_strata").to_string()
}

/// Run strata in `project`, returning (stdout, stderr, success)
fn run_strata(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(strata_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("STRATA_TARGET")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute strata with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

const MIGRATIONS: &str = "-- Version: 1.0
-- Description: Create table users
CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR);

-- Version: 1.1
-- Description: Seed users
INSERT INTO users VALUES (1, 'ada');
";

fn sample_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("strata.yml"),
        "name: sample\nmigration_paths:\n  - migrations.sql\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("migrations.sql"), MIGRATIONS).unwrap();
    dir
}

#[test]
fn test_migrate_applies_pending() {
    let project = sample_project();
    let (stdout, stderr, ok) = run_strata(project.path(), &["migrate"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(stdout.contains("v1.0 Create table users"), "{stdout}");
    assert!(stdout.contains("v1.1 Seed users"), "{stdout}");
    assert!(stdout.contains("Applied 2 migration(s)"), "{stdout}");
    assert!(project.path().join("app.duckdb").exists());
}

#[test]
fn test_migrate_twice_is_up_to_date() {
    let project = sample_project();
    assert!(run_strata(project.path(), &["migrate"]).2);
    let (stdout, _, ok) = run_strata(project.path(), &["migrate"]);
    assert!(ok);
    assert!(stdout.contains("up to date"), "{stdout}");
}

#[test]
fn test_info_json_reports_status() {
    let project = sample_project();
    let (stdout, _, ok) = run_strata(project.path(), &["info", "--output", "json"]);
    assert!(ok);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["status"], "PENDING");

    assert!(run_strata(project.path(), &["migrate"]).2);
    let (stdout, _, _) = run_strata(project.path(), &["info", "-o", "json"]);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[0]["status"], "APPLIED");
    assert!(rows[0]["applied_at"].is_string());
}

#[test]
fn test_info_table_output() {
    let project = sample_project();
    let (stdout, _, ok) = run_strata(project.path(), &["info"]);
    assert!(ok);
    assert!(stdout.contains("VERSION"));
    assert!(stdout.contains("PENDING"));
    assert!(stdout.contains("Seed users"));
}

#[test]
fn test_validate_detects_edited_script() {
    let project = sample_project();
    assert!(run_strata(project.path(), &["migrate"]).2);

    let edited = MIGRATIONS.replace("'ada'", "'grace'");
    std::fs::write(project.path().join("migrations.sql"), edited).unwrap();

    let (_, stderr, ok) = run_strata(project.path(), &["validate"]);
    assert!(!ok);
    assert!(stderr.contains("Invalid checksum for migration 1.1"), "{stderr}");

    let (_, stderr, ok) = run_strata(project.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("Migration failed"), "{stderr}");
}

#[test]
fn test_validate_passes_on_fresh_database() {
    let project = sample_project();
    let (stdout, _, ok) = run_strata(project.path(), &["validate"]);
    assert!(ok);
    assert!(stdout.contains("Validation passed: 2 migration(s)"));
}

#[test]
fn test_failing_script_exits_non_zero() {
    let project = sample_project();
    let broken = format!(
        "{MIGRATIONS}-- Version: 2\n-- Description: Broken\nSELECT * FROM missing_table;\n"
    );
    std::fs::write(project.path().join("migrations.sql"), broken).unwrap();

    let (stdout, stderr, ok) = run_strata(project.path(), &["migrate"]);
    assert!(!ok);
    assert!(stdout.contains("\u{2717} v2 Broken"), "{stdout}");
    assert!(stderr.contains("Migration failed"), "{stderr}");

    let (stdout, _, _) = run_strata(project.path(), &["info", "-o", "json"]);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[1]["status"], "APPLIED");
    assert_eq!(rows[2]["status"], "PENDING");
}

#[test]
fn test_parse_file_json() {
    let project = sample_project();
    let file = project.path().join("migrations.sql");
    let (stdout, _, ok) = run_strata(
        project.path(),
        &["parse", "--file", file.to_str().unwrap(), "--output", "json"],
    );
    assert!(ok);
    let migrations: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(migrations[1]["version"], 1.1);
    assert_eq!(migrations[1]["description"], "Seed users");
    assert_eq!(
        migrations[1]["script"],
        "INSERT INTO users VALUES (1, 'ada');\n"
    );
}

#[test]
fn test_parse_reports_missing_description() {
    let project = sample_project();
    std::fs::write(
        project.path().join("migrations.sql"),
        "-- Version: 1\nCREATE TABLE t (id INTEGER);\n",
    )
    .unwrap();
    let (_, stderr, ok) = run_strata(project.path(), &["parse"]);
    assert!(!ok);
    assert!(stderr.contains("E004"), "{stderr}");
}

#[test]
fn test_named_target_and_database_override() {
    let project = sample_project();
    std::fs::write(
        project.path().join("strata.yml"),
        "name: sample\ndatabase:\n  path: dev.duckdb\ntargets:\n  prod:\n    database:\n      path: prod.duckdb\n",
    )
    .unwrap();

    assert!(run_strata(project.path(), &["migrate", "--target", "prod"]).2);
    assert!(project.path().join("prod.duckdb").exists());
    assert!(!project.path().join("dev.duckdb").exists());

    assert!(run_strata(project.path(), &["migrate", "--database", "other.duckdb"]).2);
    assert!(project.path().join("other.duckdb").exists());

    let (_, _, ok) = run_strata(project.path(), &["migrate", "--target", "staging"]);
    assert!(!ok);
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = run_strata(dir.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("E001"), "{stderr}");
}

#[test]
fn test_read_only_commands_do_not_create_database() {
    let project = sample_project();
    let db = project.path().join("app.duckdb");

    let (stdout, stderr, ok) = run_strata(project.path(), &["validate"]);
    assert!(ok, "validate failed: {stderr}");
    assert!(stdout.contains("Validation passed"));
    assert!(!db.exists(), "validate created the database file");

    let (stdout, _, ok) = run_strata(project.path(), &["info", "-o", "json"]);
    assert!(ok);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[0]["status"], "PENDING");
    assert!(!db.exists(), "info created the database file");

    let (_, _, ok) = run_strata(project.path(), &["info", "--database", "typo.duckdb"]);
    assert!(ok);
    assert!(!project.path().join("typo.duckdb").exists());
}
