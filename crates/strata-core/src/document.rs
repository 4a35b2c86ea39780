//! Migration document parsing.
//!
//! A migration document is a plain-text file holding any number of migrations,
//! each introduced by a two-line header:
//!
//! ```text
//! -- Version: 1.1
//! -- Description: Create table users
//! CREATE TABLE users (...);
//! ```
//!
//! Everything after the description line up to the next version header (or the
//! end of the document) is that migration's script, byte for byte.
//!
//! [`format_migrations`] writes headers in canonical form: `-- Version: `,
//! `-- Description: ` and an LF line ending. Documents whose headers are
//! already canonical round-trip exactly. Headers written in another case,
//! with extra padding, or ending in CRLF are read the same way but come back
//! canonical; scripts are reproduced byte for byte either way.

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::version::Version;
use std::path::Path;

const VERSION_PREFIX: &str = "-- version:";
const DESCRIPTION_PREFIX: &str = "-- description:";

/// Parse every migration in `document`, in document order.
///
/// A document without any version header yields an empty list. Text before the
/// first header belongs to no migration and is dropped.
pub fn parse_migrations(document: &str) -> CoreResult<Vec<Migration>> {
    let mut migrations = Vec::new();
    // (version, description, byte offset where the script starts)
    let mut open: Option<(Version, String, usize)> = None;

    let mut lines = document.split_inclusive('\n').enumerate();
    let mut offset = 0;

    while let Some((idx, line)) = lines.next() {
        let line_start = offset;
        offset += line.len();

        let Some(rest) = strip_prefix_ignore_case(strip_line_ending(line), VERSION_PREFIX) else {
            continue;
        };

        let literal = rest.trim();
        let version = Version::parse(literal).ok_or_else(|| CoreError::InvalidVersionLiteral {
            line: idx + 1,
            literal: literal.to_string(),
        })?;

        let description = lines
            .next()
            .and_then(|(_, next)| {
                offset += next.len();
                strip_prefix_ignore_case(strip_line_ending(next), DESCRIPTION_PREFIX)
            })
            .map(|d| d.strip_prefix(' ').unwrap_or(d).to_string())
            .ok_or_else(|| CoreError::MissingDescription {
                line: idx + 1,
                version: literal.to_string(),
            })?;

        match open.take() {
            Some((v, d, start)) => migrations.push(Migration {
                version: v,
                description: d,
                script: document[start..line_start].to_string(),
            }),
            None if line_start > 0 => {
                log::debug!("Ignoring {line_start} bytes before the first version header");
            }
            None => {}
        }

        log::debug!("Parsed migration header v{version}: {description}");
        open = Some((version, description, offset));
    }

    if let Some((version, description, start)) = open {
        migrations.push(Migration {
            version,
            description,
            script: document[start..].to_string(),
        });
    }

    Ok(migrations)
}

/// Render migrations back into the document format.
///
/// Headers are always canonical and LF-terminated. For a document produced by
/// this function, [`parse_migrations`] followed by `format_migrations` yields
/// the same text.
pub fn format_migrations(migrations: &[Migration]) -> String {
    let mut out = String::new();
    for m in migrations {
        out.push_str(&format!("-- Version: {}\n", m.version));
        out.push_str(&format!("-- Description: {}\n", m.description));
        out.push_str(&m.script);
    }
    out
}

/// Read and parse migration documents from disk, concatenating them in order.
pub fn load_migrations<P: AsRef<Path>>(paths: &[P]) -> CoreResult<Vec<Migration>> {
    let mut migrations = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let parsed = parse_migrations(&content)?;
        log::debug!(
            "Loaded {} migrations from {}",
            parsed.len(),
            path.display()
        );
        migrations.extend(parsed);
    }
    Ok(migrations)
}

fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(l) => l.strip_suffix('\r').unwrap_or(l),
        None => line,
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
