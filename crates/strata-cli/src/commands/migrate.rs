//! Migrate command implementation

use anyhow::{Context, Result};
use strata_core::{MigrationInfo, Status};
use strata_migrate::Migrator;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::GlobalArgs;
use crate::commands::common::{format_duration, ExitCode};
use crate::context::RuntimeContext;

/// Execute the migrate command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let driver = ctx.open_driver()?;

    println!("Migrating project: {}\n", ctx.config.name);

    let (tx, mut rx) = mpsc::unbounded_channel::<MigrationInfo>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });

    let migrator = Migrator::new(&driver, ctx.migrations.clone()).with_progress(tx);
    let result = migrator.migrate().await;
    drop(migrator);
    // The sender is gone, so the printer drains what is left and stops.
    let printed = join_printer(printer).await;

    match result {
        Ok(report) => {
            printed?;
            for version in &report.skipped {
                println!("  - v{} (ignored: a later version is already applied)", version);
            }
            if report.is_empty() {
                println!("Schema is up to date, nothing to apply");
            } else {
                println!(
                    "\nApplied {} migration(s) in {}",
                    report.applied.len(),
                    format_duration(report.total_execution_time())
                );
            }
            Ok(())
        }
        Err(e) => {
            if let Err(printer_err) = printed {
                eprintln!("{printer_err:#}");
            }
            eprintln!("\nMigration failed: {e}");
            Err(ExitCode(1).into())
        }
    }
}

/// Wait for the progress printer, surfacing a panic inside it as an error
async fn join_printer(printer: JoinHandle<()>) -> Result<()> {
    printer.await.context("Progress printer task failed")
}

fn print_event(event: &MigrationInfo) {
    let m = &event.migration;
    match event.status {
        Status::Applied => println!("  \u{2713} v{} {}", m.version, m.description),
        Status::Error => println!(
            "  \u{2717} v{} {} - {}",
            m.version,
            m.description,
            event.error.as_deref().unwrap_or("unknown error")
        ),
        other => println!("  ? v{} {} ({})", m.version, m.description, other),
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
