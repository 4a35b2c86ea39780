//! In-memory driver for engine tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use strata_core::{Migration, MigrationRecord, Version};
use strata_db::{DbError, DbResult, Driver};

/// A [`Driver`] that keeps records in memory and can be told to fail.
#[derive(Default)]
pub struct MockDriver {
    /// Fail `create_tracking_table`
    pub create_error: bool,
    /// Fail `insert_record`
    pub insert_error: bool,
    /// Fail `all_records`
    pub all_error: bool,
    /// Report the tracking table as absent until `create_tracking_table` runs
    pub missing_table: bool,
    /// Fail every `execute_script`
    pub exec_error: bool,
    /// Fail `execute_script` only for this exact script
    pub fail_script: Option<String>,
    pub(crate) records: Mutex<Vec<MigrationRecord>>,
    pub(crate) executed: Mutex<Vec<String>>,
    pub(crate) created: AtomicBool,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing history
    pub fn with_records(records: Vec<MigrationRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Snapshot of the stored records, in insertion order
    pub fn records(&self) -> Vec<MigrationRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Whether `create_tracking_table` has been called
    pub fn created(&self) -> bool {
        self.created.load(Ordering::SeqCst)
    }

    /// Every script passed to `execute_script`, including failed ones
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn create_tracking_table(&self) -> DbResult<()> {
        if self.create_error {
            return Err(DbError::ExecutionError("create failed".to_string()));
        }
        self.created.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn tracking_table_exists(&self) -> DbResult<bool> {
        Ok(!self.missing_table || self.created())
    }

    async fn insert_record(&self, record: &MigrationRecord) -> DbResult<()> {
        if self.insert_error {
            return Err(DbError::ExecutionError("insert failed".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn all_records(&self) -> DbResult<Vec<MigrationRecord>> {
        if self.all_error {
            return Err(DbError::ExecutionError("list failed".to_string()));
        }
        Ok(self.records())
    }

    async fn execute_script(&self, script: &str) -> DbResult<Duration> {
        self.executed.lock().unwrap().push(script.to_string());
        if self.exec_error || self.fail_script.as_deref() == Some(script) {
            return Err(DbError::ExecutionError(format!("exec failed: {script}")));
        }
        Ok(Duration::from_millis(1))
    }
}

/// A record for `script` at `version`, as if it had been applied.
pub fn applied_record(version: impl Into<Version>, script: &str) -> MigrationRecord {
    let version = version.into();
    let description = format!("v{version}");
    MigrationRecord::applied(
        &Migration::new(version, description, script),
        Duration::from_millis(1),
    )
}
