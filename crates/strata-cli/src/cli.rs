//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Strata - ordered, checksummed schema migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Named target from strata.yml (falls back to STRATA_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override database path
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Migrate,

    /// Check migrations against the applied history without changing anything
    Validate,

    /// Show the status of every migration
    Info(InfoArgs),

    /// Parse migration documents and print what they contain
    Parse(ParseArgs),
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: InfoOutput,
}

/// Info output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Parse this document instead of the configured migration paths
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: ParseOutput,
}

/// Parse output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutput {
    /// Human-readable listing
    Pretty,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
