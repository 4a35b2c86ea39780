//! Error types for strata-db

use thiserror::Error;

/// Driver operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Invalid tracking table name (D003)
    #[error("[D003] Invalid table name '{0}': expected [schema.]identifier")]
    InvalidIdentifier(String),

    /// Mutex poisoned (D004)
    #[error("[D004] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Stored record could not be decoded (D005)
    #[error("[D005] Corrupt migration record for version {version}: {message}")]
    CorruptRecord { version: f64, message: String },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
