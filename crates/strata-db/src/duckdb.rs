//! DuckDB driver implementation

use crate::error::{DbError, DbResult};
use crate::traits::Driver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use strata_core::config::DEFAULT_TABLE;
use strata_core::{MigrationRecord, Version};

/// DuckDB migration driver
///
/// Records applied migrations in a tracking table (default
/// `strata_migrations`) and runs each script inside its own transaction.
///
/// Scripts must not manage transactions themselves. A `COMMIT` inside a
/// script ends the driver's transaction early: the work before it is kept,
/// the driver's own `COMMIT` then fails, and the migration is reported as
/// failed with no record written. A `BEGIN` inside a script fails outright.
pub struct DuckDbDriver {
    conn: Mutex<Connection>,
    table: String,
}

impl DuckDbDriver {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Use a different tracking table, optionally schema-qualified
    pub fn with_table(mut self, table: &str) -> DbResult<Self> {
        validate_table_name(table)?;
        self.table = table.to_string();
        Ok(self)
    }

    /// Name of the tracking table
    pub fn table(&self) -> &str {
        &self.table
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn create_tracking_table_sync(&self) -> DbResult<()> {
        let conn = self.lock()?;
        log::debug!("Ensuring tracking table {} exists", self.table);
        if let Some((schema, _)) = self.table.split_once('.') {
            conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))?;
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version           DOUBLE  NOT NULL PRIMARY KEY,
                 description       VARCHAR NOT NULL,
                 checksum          VARCHAR NOT NULL,
                 applied_at        BIGINT  NOT NULL,
                 execution_time_us BIGINT  NOT NULL
             )",
            self.table
        ))?;
        Ok(())
    }

    fn tracking_table_exists_sync(&self) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = self.table.split_once('.').unwrap_or(("main", self.table.as_str()));
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    fn insert_record_sync(&self, record: &MigrationRecord) -> DbResult<()> {
        let conn = self.lock()?;
        let execution_time_us = i64::try_from(record.execution_time.as_micros()).unwrap_or(i64::MAX);
        conn.execute(
            &format!(
                "INSERT INTO {} (version, description, checksum, applied_at, execution_time_us)
                 VALUES (?, ?, ?, ?, ?)",
                self.table
            ),
            duckdb::params![
                record.version.value(),
                record.description,
                record.checksum,
                record.applied_at.timestamp_micros(),
                execution_time_us,
            ],
        )
        .map_err(|e| {
            DbError::ExecutionError(format!(
                "failed to record migration {}: {e}",
                record.version
            ))
        })?;
        Ok(())
    }

    fn all_records_sync(&self) -> DbResult<Vec<MigrationRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT version, description, checksum, applied_at, execution_time_us
             FROM {} ORDER BY version",
            self.table
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (version, description, checksum, applied_at, execution_time_us) = row?;
            records.push(decode_record(
                version,
                description,
                checksum,
                applied_at,
                execution_time_us,
            )?);
        }
        Ok(records)
    }

    fn execute_script_sync(&self, script: &str) -> DbResult<Duration> {
        let conn = self.lock()?;
        let start = Instant::now();

        conn.execute_batch("BEGIN TRANSACTION")?;
        if let Err(e) = conn.execute_batch(script) {
            rollback(&conn);
            return Err(DbError::ExecutionError(e.to_string()));
        }
        if let Err(e) = conn.execute_batch("COMMIT") {
            rollback(&conn);
            return Err(DbError::ExecutionError(format!("COMMIT failed: {e}")));
        }

        let elapsed = start.elapsed();
        log::debug!("Script committed in {:?}", elapsed);
        Ok(elapsed)
    }
}

#[async_trait]
impl Driver for DuckDbDriver {
    async fn create_tracking_table(&self) -> DbResult<()> {
        self.create_tracking_table_sync()
    }

    async fn tracking_table_exists(&self) -> DbResult<bool> {
        self.tracking_table_exists_sync()
    }

    async fn insert_record(&self, record: &MigrationRecord) -> DbResult<()> {
        self.insert_record_sync(record)
    }

    async fn all_records(&self) -> DbResult<Vec<MigrationRecord>> {
        self.all_records_sync()
    }

    async fn execute_script(&self, script: &str) -> DbResult<Duration> {
        self.execute_script_sync(script)
    }
}

fn rollback(conn: &Connection) {
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        log::warn!("ROLLBACK failed: {e}");
    }
}

fn decode_record(
    version: f64,
    description: String,
    checksum: String,
    applied_at: i64,
    execution_time_us: i64,
) -> DbResult<MigrationRecord> {
    let applied_at =
        DateTime::<Utc>::from_timestamp_micros(applied_at).ok_or_else(|| DbError::CorruptRecord {
            version,
            message: format!("applied_at {applied_at} is out of range"),
        })?;
    let execution_time = u64::try_from(execution_time_us)
        .map(Duration::from_micros)
        .map_err(|_| DbError::CorruptRecord {
            version,
            message: format!("negative execution time {execution_time_us}"),
        })?;

    Ok(MigrationRecord {
        version: Version::new(version),
        description,
        checksum,
        applied_at,
        execution_time,
    })
}

/// Check that `name` is `identifier` or `schema.identifier`.
fn validate_table_name(name: &str) -> DbResult<()> {
    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    let valid = match name.split_once('.') {
        Some((schema, table)) => is_identifier(schema) && is_identifier(table),
        None => is_identifier(name),
    };
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
