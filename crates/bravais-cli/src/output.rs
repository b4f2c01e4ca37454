//! Shared output helpers for text and JSON modes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::OutputFormat;

/// Print a result as pretty JSON when `--format json` is selected.
///
/// Text mode is handled by each command, so this is a no-op there.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    if let OutputFormat::Json = format {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }
}

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize mesh")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
