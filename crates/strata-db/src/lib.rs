//! strata-db - Driver layer for Strata
//!
//! This crate provides the `Driver` capability trait used by the migration
//! engine and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbDriver;
pub use error::{DbError, DbResult};
pub use traits::Driver;
