//! Driver capability trait

use crate::error::DbResult;
use async_trait::async_trait;
use std::time::Duration;
use strata_core::MigrationRecord;

/// Storage and execution capability used by the migration engine.
///
/// The engine awaits each call to completion before issuing the next one, so
/// implementations never see overlapping calls from a single run. Each
/// operation is treated as atomic.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Ensure the migration tracking table exists
    async fn create_tracking_table(&self) -> DbResult<()>;

    /// Check whether the tracking table exists, without creating it
    async fn tracking_table_exists(&self) -> DbResult<bool>;

    /// Durably store one applied migration
    async fn insert_record(&self, record: &MigrationRecord) -> DbResult<()>;

    /// List every persisted migration record
    async fn all_records(&self) -> DbResult<Vec<MigrationRecord>>;

    /// Execute a migration script, returning how long it took
    async fn execute_script(&self, script: &str) -> DbResult<Duration>;
}
