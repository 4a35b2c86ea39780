//! Error types for the migration engine

use strata_core::Version;
use strata_db::DbError;
use thiserror::Error;

/// Migration engine errors.
///
/// Integrity violations carry the offending version so callers can match on
/// the kind of violation instead of parsing messages.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A declared version is zero, negative, or not finite (M001).
    #[error("[M001] Illegal migration version number {version}")]
    IllegalVersion { version: Version },

    /// Two declared migrations share a version (M002).
    #[error("[M002] Multiple migrations have the version number {version}")]
    DuplicateVersion { version: Version },

    /// An applied migration is missing from the declared list (M003).
    #[error("[M003] Migration {version} was removed from the migration list")]
    RemovedMigration { version: Version },

    /// An applied migration's script was edited afterwards (M004).
    #[error("[M004] Invalid checksum for migration {version}")]
    ChecksumMismatch { version: Version },

    /// Failure reported by the driver (M005).
    #[error("[M005] Driver failure: {0}")]
    Driver(#[from] DbError),
}

impl MigrateError {
    /// The version named by an integrity violation, if any.
    pub fn version(&self) -> Option<Version> {
        match self {
            MigrateError::IllegalVersion { version }
            | MigrateError::DuplicateVersion { version }
            | MigrateError::RemovedMigration { version }
            | MigrateError::ChecksumMismatch { version } => Some(version.clone()),
            MigrateError::Driver(_) => None,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
