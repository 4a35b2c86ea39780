//! Shared helpers for CLI commands

use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Commands return `Err(ExitCode(N).into())` after printing their own
/// diagnostics; `main` turns it into the process exit status.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Milliseconds with sub-millisecond precision for short scripts
pub(crate) fn format_duration(d: std::time::Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 10.0 {
        format!("{ms:.2}ms")
    } else {
        format!("{ms:.0}ms")
    }
}
