//! Newline-delimited JSON dataset files.
//!
//! Writes go to a temporary file in the destination directory and are
//! renamed into place, so a failed write never leaves a partial dataset.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::ExportError;

/// Extension every dataset file carries.
pub const DATASET_EXTENSION: &str = "jsonl";

/// Writes `records` to `path`, one JSON object per line.
///
/// Returns the number of records written.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<usize, ExportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let tmp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| ExportError::Persist(e.error.to_string()))?;

    tracing::info!(path = %path.display(), count = records.len(), "Wrote dataset");
    Ok(records.len())
}

/// Reads every non-blank line of `path` into a record.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExportError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExportError::NotFound(path.display().to_string()),
        _ => ExportError::Io(e),
    })?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| ExportError::MalformedLine {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Counts non-blank lines without parsing them.
pub fn count_records(path: &Path) -> Result<usize, ExportError> {
    let file = File::open(path)?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Default dataset file name, stamped with the current time.
pub fn default_filename() -> String {
    format!(
        "trading_dataset_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        DATASET_EXTENSION
    )
}

/// Normalizes a caller-supplied dataset name.
///
/// The name must be a plain file name; `.jsonl` is appended when missing.
pub fn sanitize_filename(name: &str) -> Result<String, ExportError> {
    let trimmed = name.trim();
    let plain = !trimmed.is_empty()
        && trimmed != "."
        && !trimmed.contains("..")
        && !trimmed.contains('/')
        && !trimmed.contains('\\')
        && !trimmed.contains('\0');
    if !plain {
        return Err(ExportError::InvalidFilename(name.to_string()));
    }

    let suffix = format!(".{}", DATASET_EXTENSION);
    if trimmed.ends_with(&suffix) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, suffix))
    }
}

/// Resolves a caller-supplied dataset name inside `dir`.
pub fn dataset_path(dir: &Path, name: &str) -> Result<PathBuf, ExportError> {
    Ok(dir.join(sanitize_filename(name)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        text: String,
    }

    fn rows() -> Vec<Row> {
        (0..3)
            .map(|id| Row {
                id,
                text: format!("row {id}"),
            })
            .collect()
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("nested").join("data.jsonl");

        let written = write_jsonl(&path, &rows()).expect("should write");
        assert_eq!(written, 3);

        let content = fs::read_to_string(&path).expect("should read file");
        assert_eq!(content.lines().count(), 3);
        assert!(content.ends_with('\n'));

        let back: Vec<Row> = read_jsonl(&path).expect("should read");
        assert_eq!(back, rows());
        assert_eq!(count_records(&path).expect("count"), 3);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("data.jsonl");
        write_jsonl(&path, &rows()).expect("should write");

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("data.jsonl")]);
    }

    #[test]
    fn test_read_reports_bad_line() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("bad.jsonl");
        fs::write(&path, "{\"id\":1,\"text\":\"a\"}\n\n{oops}\n").expect("write");

        let err = read_jsonl::<Row>(&path).unwrap_err();
        assert!(matches!(err, ExportError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let err = read_jsonl::<Row>(&temp_dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, ExportError::NotFound(_)));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("train").expect("ok"), "train.jsonl");
        assert_eq!(sanitize_filename("train.jsonl").expect("ok"), "train.jsonl");
        for bad in ["", "  ", "../etc/passwd", "a/b", "a\\b", ".."] {
            assert!(
                matches!(sanitize_filename(bad), Err(ExportError::InvalidFilename(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_default_filename_shape() {
        let name = default_filename();
        assert!(name.starts_with("trading_dataset_"));
        assert!(name.ends_with(".jsonl"));
        // trading_dataset_YYYYmmdd_HHMMSS.jsonl
        assert_eq!(name.len(), "trading_dataset_".len() + 15 + ".jsonl".len());
    }
}
