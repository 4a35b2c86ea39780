//! strata-core - Core library for Strata
//!
//! This crate provides the shared migration types, the migration document
//! parser, checksums, and configuration parsing used across all Strata
//! components.

pub mod checksum;
pub mod config;
pub mod document;
pub mod error;
pub mod migration;
pub(crate) mod serde_helpers;
pub mod version;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, TargetConfig};
pub use document::{format_migrations, load_migrations, parse_migrations};
pub use error::{CoreError, CoreResult};
pub use migration::{sort_by_version, Migration, MigrationInfo, MigrationRecord, Status};
pub use version::Version;
