//! A driver and declared migration list bundled together.

use crate::error::MigrateResult;
use crate::runner::{MigrationReport, MigrationRunner};
use strata_core::{Migration, MigrationInfo};
use strata_db::Driver;
use tokio::sync::mpsc::UnboundedSender;

/// Runs `migrate`, `validate` and `info` for one declared list against one driver.
pub struct Migrator<'a> {
    driver: &'a dyn Driver,
    migrations: Vec<Migration>,
    progress: Option<UnboundedSender<MigrationInfo>>,
}

impl<'a> Migrator<'a> {
    pub fn new(driver: &'a dyn Driver, migrations: Vec<Migration>) -> Self {
        Self {
            driver,
            migrations,
            progress: None,
        }
    }

    /// Receive an event for every migration applied or failed by [`migrate`](Self::migrate)
    pub fn with_progress(mut self, sender: UnboundedSender<MigrationInfo>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// The declared migrations, in declaration order
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub async fn migrate(&self) -> MigrateResult<MigrationReport> {
        let mut runner = MigrationRunner::new(self.driver);
        if let Some(sender) = &self.progress {
            runner = runner.with_progress(sender.clone());
        }
        runner.run(&self.migrations).await
    }

    pub async fn validate(&self) -> MigrateResult<()> {
        crate::validate::validate(self.driver, &self.migrations).await
    }

    pub async fn info(&self) -> MigrateResult<Vec<MigrationInfo>> {
        crate::status::info(self.driver, &self.migrations).await
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
