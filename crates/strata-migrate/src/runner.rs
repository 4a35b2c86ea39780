//! Migration execution

use crate::error::MigrateResult;
use crate::status::compute_info;
use crate::validate::{validate_declared, validate_history};
use std::time::Duration;
use strata_core::{Migration, MigrationInfo, MigrationRecord, Status, Version};
use strata_db::Driver;
use tokio::sync::mpsc::UnboundedSender;

/// Migrations selected for execution, in ascending version order
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    /// Migrations to run, in order
    pub migrations: Vec<Migration>,

    /// Unapplied versions below the watermark, which are never run
    pub skipped: Vec<Version>,
}

/// Build the execution plan for a validated declared list.
///
/// Only `Pending` migrations are planned. `Ignored` ones (no record, but below
/// the highest applied version) are left out so that history stays in version
/// order.
pub fn plan_migrations(records: &[MigrationRecord], migrations: &[Migration]) -> MigrationPlan {
    let mut plan = MigrationPlan::default();
    for info in compute_info(records, migrations) {
        match info.status {
            Status::Pending => plan.migrations.push(info.migration),
            Status::Ignored => plan.skipped.push(info.migration.version),
            _ => {}
        }
    }
    plan
}

/// Outcome of a successful migration run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Records inserted by this run, in execution order
    pub applied: Vec<MigrationRecord>,

    /// Versions skipped because they fall below the watermark
    pub skipped: Vec<Version>,
}

impl MigrationReport {
    /// True when nothing was applied
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Sum of the execution times of every applied migration
    pub fn total_execution_time(&self) -> Duration {
        self.applied.iter().map(|r| r.execution_time).sum()
    }
}

/// Applies pending migrations one at a time through a [`Driver`]
pub struct MigrationRunner<'a> {
    driver: &'a dyn Driver,
    progress: Option<UnboundedSender<MigrationInfo>>,
}

impl<'a> MigrationRunner<'a> {
    /// Create a new migration runner
    pub fn new(driver: &'a dyn Driver) -> Self {
        Self {
            driver,
            progress: None,
        }
    }

    /// Send an `Applied` or `Error` event for each migration the run touches
    pub fn with_progress(mut self, sender: UnboundedSender<MigrationInfo>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Create the tracking table, validate, then apply every pending migration.
    ///
    /// Stops at the first failing script or record insert. Migrations applied
    /// before the failure stay recorded; nothing after it is attempted.
    ///
    /// A migration is recorded only after its script succeeded, so a crash in
    /// between leaves it pending and it will run again next time. Scripts that
    /// are not idempotent need their own guard against that.
    pub async fn run(&self, migrations: &[Migration]) -> MigrateResult<MigrationReport> {
        self.driver.create_tracking_table().await?;

        validate_declared(migrations)?;
        let records = self.driver.all_records().await?;
        validate_history(&records, migrations)?;

        let plan = plan_migrations(&records, migrations);
        for version in &plan.skipped {
            log::warn!("Skipping migration v{version}: a later version is already applied");
        }
        log::info!("{} migrations to apply", plan.migrations.len());

        let mut report = MigrationReport {
            applied: Vec::with_capacity(plan.migrations.len()),
            skipped: plan.skipped,
        };

        for migration in plan.migrations {
            log::debug!("Applying migration v{}: {}", migration.version, migration.description);

            let elapsed = match self.driver.execute_script(&migration.script).await {
                Ok(elapsed) => elapsed,
                Err(e) => {
                    self.notify(MigrationInfo::failed(migration, e.to_string()));
                    return Err(e.into());
                }
            };

            let record = MigrationRecord::applied(&migration, elapsed);
            if let Err(e) = self.driver.insert_record(&record).await {
                self.notify(MigrationInfo::failed(migration, e.to_string()));
                return Err(e.into());
            }

            log::debug!("Applied migration v{} in {:?}", record.version, elapsed);
            self.notify(MigrationInfo::applied(migration, record.applied_at));
            report.applied.push(record);
        }

        Ok(report)
    }

    fn notify(&self, info: MigrationInfo) {
        if let Some(sender) = &self.progress {
            // A dropped receiver only means nobody is listening.
            let _ = sender.send(info);
        }
    }
}

/// Apply every pending migration in `migrations` through `driver`.
pub async fn migrate(driver: &dyn Driver, migrations: &[Migration]) -> MigrateResult<MigrationReport> {
    MigrationRunner::new(driver).run(migrations).await
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
