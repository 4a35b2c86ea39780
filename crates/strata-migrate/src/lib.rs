//! strata-migrate - Migration engine for Strata
//!
//! Validates a declared migration list against the history kept by a
//! [`Driver`](strata_db::Driver), reports per-migration status, and applies
//! pending migrations in version order.

pub mod error;
pub mod migrator;
pub mod runner;
pub mod status;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use runner::{migrate, plan_migrations, MigrationPlan, MigrationReport, MigrationRunner};
pub use status::{applied_history, compute_info, info, watermark};
pub use validate::{validate, validate_declared, validate_history};
