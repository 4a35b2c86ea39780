//! Validate command implementation

use anyhow::Result;
use strata_migrate::{validate, validate_declared};

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

/// Execute the validate command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    println!("Validating project: {}\n", ctx.config.name);

    let result = match validate_declared(&ctx.migrations) {
        Err(e) => Err(e),
        Ok(()) => match ctx.open_existing_driver()? {
            Some(driver) => validate(&driver, &ctx.migrations).await,
            // No database means no history to check against.
            None => Ok(()),
        },
    };

    match result {
        Ok(()) => {
            println!("Validation passed: {} migration(s)", ctx.migrations.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Validation failed: {e}");
            Err(ExitCode(1).into())
        }
    }
}
