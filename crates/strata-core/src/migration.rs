//! Declared migrations, persisted migration records, and report rows.

use crate::checksum::compute_checksum;
use crate::serde_helpers::duration_ms;
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A declared migration: one versioned script from the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    /// Version number; unique and strictly positive within a valid list
    pub version: Version,

    /// Free-text description
    pub description: String,

    /// Script executed against the target store
    pub script: String,
}

impl Migration {
    /// Create a new migration
    pub fn new(
        version: impl Into<Version>,
        description: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            description: description.into(),
            script: script.into(),
        }
    }

    /// Checksum of the current script
    pub fn checksum(&self) -> String {
        compute_checksum(&self.script)
    }
}

/// A migration that has been executed and recorded by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Version of the applied migration
    pub version: Version,

    /// Description at the time it was applied
    pub description: String,

    /// Checksum of the script that was executed
    pub checksum: String,

    /// When the migration finished executing
    pub applied_at: DateTime<Utc>,

    /// How long the script took to run
    #[serde(with = "duration_ms", rename = "execution_time_ms")]
    pub execution_time: Duration,
}

impl MigrationRecord {
    /// Build the record for a migration whose script just ran successfully.
    pub fn applied(migration: &Migration, execution_time: Duration) -> Self {
        Self {
            version: migration.version.clone(),
            description: migration.description.clone(),
            checksum: migration.checksum(),
            applied_at: Utc::now(),
            execution_time,
        }
    }
}

/// Lifecycle state of a declared migration relative to persisted history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Recorded as applied
    Applied,
    /// Not applied, but a later version already is; permanently skipped
    Ignored,
    /// Not applied yet and eligible to run
    Pending,
    /// Execution or recording failed during a run
    Error,
    /// Any unknown state
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Applied => write!(f, "APPLIED"),
            Status::Ignored => write!(f, "IGNORED"),
            Status::Pending => write!(f, "PENDING"),
            Status::Error => write!(f, "ERROR"),
            Status::Invalid => write!(f, "INVALID"),
        }
    }
}

/// A declared migration annotated with its computed status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationInfo {
    /// Computed status
    pub status: Status,

    /// The declared migration
    pub migration: Migration,

    /// When the matching record was applied (only for applied migrations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,

    /// Failure message (only for [`Status::Error`] progress events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrationInfo {
    /// Create a report row without an applied timestamp or error
    pub fn new(status: Status, migration: Migration) -> Self {
        Self {
            status,
            migration,
            applied_at: None,
            error: None,
        }
    }

    /// Create an applied row carrying the record's timestamp
    pub fn applied(migration: Migration, applied_at: DateTime<Utc>) -> Self {
        Self {
            status: Status::Applied,
            migration,
            applied_at: Some(applied_at),
            error: None,
        }
    }

    /// Create an error row with the failure message
    pub fn failed(migration: Migration, error: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            migration,
            applied_at: None,
            error: Some(error.into()),
        }
    }
}

/// Sort migrations ascending by version, keeping declaration order on ties.
pub fn sort_by_version(migrations: &mut [Migration]) {
    migrations.sort_by(|a, b| a.version.value().total_cmp(&b.version.value()));
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
