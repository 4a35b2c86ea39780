//! Integrity checks run before any migration is applied.

use crate::error::{MigrateError, MigrateResult};
use crate::status::applied_history;
use std::collections::HashSet;
use strata_core::{Migration, MigrationRecord};
use strata_db::Driver;

/// Check the declared list on its own: versions must be positive and unique.
pub fn validate_declared(migrations: &[Migration]) -> MigrateResult<()> {
    if let Some(m) = migrations.iter().find(|m| !m.version.is_positive()) {
        return Err(MigrateError::IllegalVersion { version: m.version.clone() });
    }

    let mut seen = HashSet::with_capacity(migrations.len());
    for m in migrations {
        if !seen.insert(m.version.value().to_bits()) {
            return Err(MigrateError::DuplicateVersion { version: m.version.clone() });
        }
    }
    Ok(())
}

/// Check persisted history against the declared list.
///
/// Every record must still be declared, and its checksum must match the
/// declared script. All removals are reported before any checksum mismatch.
pub fn validate_history(records: &[MigrationRecord], migrations: &[Migration]) -> MigrateResult<()> {
    let declared = |record: &MigrationRecord| migrations.iter().find(|m| m.version == record.version);

    if let Some(record) = records.iter().find(|r| declared(*r).is_none()) {
        return Err(MigrateError::RemovedMigration {
            version: record.version.clone(),
        });
    }

    for record in records {
        if let Some(migration) = declared(record) {
            if migration.checksum() != record.checksum {
                return Err(MigrateError::ChecksumMismatch {
                    version: record.version.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Validate the declared list and the driver's history. Read-only.
pub async fn validate(driver: &dyn Driver, migrations: &[Migration]) -> MigrateResult<()> {
    validate_declared(migrations)?;
    let records = applied_history(driver).await?;
    validate_history(&records, migrations)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
