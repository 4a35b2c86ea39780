//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use strata_core::{load_migrations, Config, DatabaseConfig, Migration};
use strata_db::DuckDbDriver;

use crate::cli::GlobalArgs;

/// Runtime context containing the loaded configuration and migrations
pub struct RuntimeContext {
    /// Project configuration
    pub config: Config,

    /// Project root directory
    pub root: PathBuf,

    /// Declared migrations, in document order
    pub migrations: Vec<Migration>,

    /// Database settings after target and CLI overrides
    pub database: DatabaseConfig,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Load configuration and migration documents from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = match &args.config {
            Some(config_path) => {
                Config::load(Path::new(config_path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
        };

        let target = Config::resolve_target(args.target.as_deref());
        let mut database = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve target")?;
        if let Some(path) = &args.database {
            database.path = path.clone();
        }

        let paths = config.migration_paths_absolute(&root);
        let migrations = load_migrations(&paths).context("Failed to load migrations")?;

        let ctx = Self {
            config,
            root,
            migrations,
            database,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Loaded {} migrations for project '{}' from {} document(s)",
            ctx.migrations.len(),
            ctx.config.name,
            paths.len()
        ));
        if let Some(name) = target {
            ctx.verbose(&format!("Using target '{name}'"));
        }
        Ok(ctx)
    }

    /// Open the configured DuckDB database
    pub fn open_driver(&self) -> Result<DuckDbDriver> {
        let path = self.database_path();
        self.verbose(&format!(
            "Opening {} (table {})",
            path, self.database.table
        ));
        DuckDbDriver::new(&path)
            .and_then(|driver| driver.with_table(&self.database.table))
            .context("Failed to connect to database")
    }

    /// Open the configured database only if it already exists.
    ///
    /// Read-only commands use this so that a new or mistyped path is never
    /// created on disk.
    pub fn open_existing_driver(&self) -> Result<Option<DuckDbDriver>> {
        let path = self.database_path();
        if path != ":memory:" && !Path::new(&path).exists() {
            self.verbose(&format!("Database {} does not exist yet", path));
            return Ok(None);
        }
        self.open_driver().map(Some)
    }

    /// Database path, resolved against the project root for relative files
    fn database_path(&self) -> String {
        let path = Path::new(&self.database.path);
        if self.database.path == ":memory:" || path.is_absolute() {
            self.database.path.clone()
        } else {
            self.root.join(path).display().to_string()
        }
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}
