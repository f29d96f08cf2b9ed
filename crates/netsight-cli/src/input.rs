//! Edge-row input: a JSON array of `{source, target, weight, type, time?}`
//! objects, read from a file or from stdin when the path is `-`.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use netsight_core::EdgeRow;

/// Read and parse edge rows from `path` (`-` for stdin).
pub fn read_rows(path: &Path) -> Result<Vec<EdgeRow>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read edge rows from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    parse_rows(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_rows(content: &str) -> Result<Vec<EdgeRow>> {
    let rows: Vec<EdgeRow> = serde_json::from_str(content)?;
    tracing::debug!(rows = rows.len(), "edge rows parsed");
    Ok(rows)
}
