//! Parse command implementation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use strata_core::{load_migrations, Config, Migration};

use crate::cli::{GlobalArgs, ParseArgs, ParseOutput};

/// Execute the parse command
pub(crate) async fn execute(args: &ParseArgs, global: &GlobalArgs) -> Result<()> {
    let paths = document_paths(args, global)?;
    if global.verbose {
        for path in &paths {
            eprintln!("[verbose] Parsing {}", path.display());
        }
    }

    let migrations = load_migrations(&paths).context("Failed to parse migrations")?;

    match args.output {
        ParseOutput::Pretty => print_pretty(&migrations),
        ParseOutput::Json => {
            let json = serde_json::to_string_pretty(&migrations)
                .context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// `--file` if given, otherwise the configured migration paths
fn document_paths(args: &ParseArgs, global: &GlobalArgs) -> Result<Vec<PathBuf>> {
    if let Some(file) = &args.file {
        return Ok(vec![PathBuf::from(file)]);
    }

    let root = Path::new(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(root),
    }
    .context("Failed to load project configuration")?;
    Ok(config.migration_paths_absolute(root))
}

fn print_pretty(migrations: &[Migration]) {
    if migrations.is_empty() {
        println!("No migrations found");
        return;
    }

    for m in migrations {
        let lines = m.script.lines().count();
        println!(
            "v{}  {}  ({} line(s), checksum {})",
            m.version,
            m.description,
            lines,
            &m.checksum()[..12]
        );
    }
    println!("\n{} migration(s)", migrations.len());
}
