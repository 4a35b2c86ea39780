//! Info command implementation

use anyhow::{Context, Result};
use strata_core::MigrationInfo;
use strata_migrate::{compute_info, info};

use crate::cli::{GlobalArgs, InfoArgs, InfoOutput};
use crate::context::RuntimeContext;

/// Execute the info command
pub(crate) async fn execute(args: &InfoArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let infos = match ctx.open_existing_driver()? {
        Some(driver) => info(&driver, &ctx.migrations)
            .await
            .context("Failed to read migration history")?,
        None => compute_info(&[], &ctx.migrations),
    };

    match args.output {
        InfoOutput::Table => print_table(&infos),
        InfoOutput::Json => print_json(&infos)?,
    }
    Ok(())
}

/// Print migration statuses in table format
fn print_table(infos: &[MigrationInfo]) {
    if infos.is_empty() {
        println!("No migrations found");
        return;
    }

    let version_width = infos
        .iter()
        .map(|i| i.migration.version.to_string().len())
        .max()
        .unwrap_or(7)
        .max(7);
    let status_width = 7;
    let applied_width = 19;

    println!(
        "{:<version_width$}  {:<status_width$}  {:<applied_width$}  DESCRIPTION",
        "VERSION", "STATUS", "APPLIED_AT"
    );
    println!(
        "{}  {}  {}  {}",
        "-".repeat(version_width),
        "-".repeat(status_width),
        "-".repeat(applied_width),
        "-".repeat(11)
    );

    for i in infos {
        let applied_at = i
            .applied_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<version_width$}  {:<status_width$}  {:<applied_width$}  {}",
            i.migration.version.to_string(),
            i.status.to_string(),
            applied_at,
            i.migration.description
        );
    }
}

/// Print migration statuses as JSON
fn print_json(infos: &[MigrationInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(infos).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
