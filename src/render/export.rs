//! File exports.
//!
//! Each writer returns the path it wrote so the caller can report it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a two-column CSV, rows sorted by category.
pub fn write_csv(
    dir: &Path,
    file_name: &str,
    header: (&str, &str),
    rows: &[(String, usize)],
) -> Result<PathBuf, ExportError> {
    let mut sorted: Vec<&(String, usize)> = rows.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut content = format!("{},{}\n", csv_field(header.0), csv_field(header.1));
    for (category, count) in sorted {
        content.push_str(&format!("{},{}\n", csv_field(category), count));
    }

    write_file(dir, file_name, &content)
}

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf, ExportError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_file(dir, file_name, &content)
}

fn write_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);
    fs::write(&path, content).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
