//! Enumeration of dataset files on disk.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::error::ExportError;

use super::jsonl::{count_records, DATASET_EXTENSION};

/// Summary of one dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub size_bytes: u64,
    /// Size in megabytes, rounded to two decimals.
    pub size_mb: f64,
    /// Number of non-blank lines.
    pub samples: usize,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

fn is_dataset(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == DATASET_EXTENSION)
            .unwrap_or(false)
}

/// Lists dataset files directly inside `dir`, newest modification first.
///
/// A missing directory yields an empty list.
pub fn list_datasets(dir: &Path) -> Result<Vec<DatasetInfo>, ExportError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut datasets = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(is_dataset)
    {
        let meta = entry.metadata().map_err(|e| {
            ExportError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
            )
        })?;
        let modified: DateTime<Utc> = meta.modified()?.into();
        // Not every filesystem records a birth time.
        let created: DateTime<Utc> = meta.created().map(Into::into).unwrap_or(modified);
        let size_bytes = meta.len();

        datasets.push(DatasetInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes,
            size_mb: (size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            samples: count_records(entry.path())?,
            created,
            modified,
        });
    }

    datasets.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(datasets)
}
