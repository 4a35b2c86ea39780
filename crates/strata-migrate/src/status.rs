//! Status computation: declared migrations diffed against persisted history.

use crate::error::MigrateResult;
use strata_core::{sort_by_version, Migration, MigrationInfo, MigrationRecord, Status, Version};
use strata_db::Driver;

/// Highest version present in persisted history, if any.
pub fn watermark(records: &[MigrationRecord]) -> Option<Version> {
    records
        .iter()
        .map(|r| &r.version)
        .max_by(|a, b| a.value().total_cmp(&b.value()))
        .cloned()
}

/// Compute the status of every declared migration, in ascending version order.
///
/// A migration with a record is `Applied`. One without a record whose version
/// is below the watermark is `Ignored`: a later migration already ran, so it
/// can no longer be applied in order. Everything else is `Pending`.
pub fn compute_info(records: &[MigrationRecord], migrations: &[Migration]) -> Vec<MigrationInfo> {
    let mut sorted = migrations.to_vec();
    sort_by_version(&mut sorted);
    let watermark = watermark(records);

    sorted
        .into_iter()
        .map(|migration| {
            match records.iter().find(|r| r.version == migration.version) {
                Some(record) => MigrationInfo::applied(migration, record.applied_at),
                None if watermark.as_ref().is_some_and(|w| migration.version < *w) => {
                    MigrationInfo::new(Status::Ignored, migration)
                }
                None => MigrationInfo::new(Status::Pending, migration),
            }
        })
        .collect()
}

/// Persisted history, read without creating anything.
///
/// A missing tracking table means nothing has been applied yet.
pub async fn applied_history(driver: &dyn Driver) -> MigrateResult<Vec<MigrationRecord>> {
    if !driver.tracking_table_exists().await? {
        log::debug!("No tracking table yet, treating history as empty");
        return Ok(Vec::new());
    }
    Ok(driver.all_records().await?)
}

/// List persisted records through `driver` and report the status of each
/// declared migration. Read-only.
pub async fn info(driver: &dyn Driver, migrations: &[Migration]) -> MigrateResult<Vec<MigrationInfo>> {
    let records = applied_history(driver).await?;
    Ok(compute_info(&records, migrations))
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
