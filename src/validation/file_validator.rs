//! Streaming validation of dataset files.
//!
//! Every non-blank line is validated independently. Invalid lines are
//! counted and the first `max_errors` of them are reported with their
//! 1-based line number; a bad line never stops the pass.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ValidationError;

use super::schema_validator::SchemaValidator;

/// Default cap on reported line errors.
pub const DEFAULT_MAX_ERRORS: usize = 50;

/// One rejected line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    /// Offending field, when the failure is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Description of the failure.
    pub reason: String,
}

/// Outcome of validating a whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no line failed.
    pub valid: bool,
    pub valid_count: usize,
    /// Every invalid line, including those not listed in `errors`.
    pub error_count: usize,
    /// The first invalid lines, capped.
    pub errors: Vec<LineError>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            valid: true,
            valid_count: 0,
            error_count: 0,
            errors: Vec::new(),
        }
    }

    fn record_error(&mut self, line: usize, error: ValidationError, max_errors: usize) {
        self.valid = false;
        self.error_count += 1;
        if self.errors.len() < max_errors {
            let (field, reason) = match error {
                ValidationError::SchemaViolation { field, reason } => (Some(field), reason),
                other => (None, other.to_string()),
            };
            self.errors.push(LineError {
                line,
                field,
                reason,
            });
        }
    }

    /// Total records seen.
    pub fn total(&self) -> usize {
        self.valid_count + self.error_count
    }
}

/// Validate newline-delimited records from a reader.
pub fn validate_reader<R: BufRead>(
    reader: R,
    max_errors: usize,
) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                let error = ValidationError::Malformed(format!("invalid UTF-8: {}", e.utf8_error()));
                report.record_error(idx + 1, error, max_errors);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match SchemaValidator::validate_line(&line) {
            Ok(()) => report.valid_count += 1,
            Err(e) => report.record_error(idx + 1, e, max_errors),
        }
    }

    tracing::debug!(
        valid = report.valid_count,
        invalid = report.error_count,
        "Validated dataset stream"
    );
    Ok(report)
}

/// Validate newline-delimited records held in memory.
pub fn validate_text(text: &str, max_errors: usize) -> ValidationReport {
    // Reading from a byte slice cannot fail with an IO error.
    validate_reader(text.as_bytes(), max_errors).unwrap_or_else(|e| {
        let mut report = ValidationReport::new();
        report.record_error(0, e, max_errors);
        report
    })
}

/// Validate a dataset file on disk.
pub fn validate_file(path: &Path, max_errors: usize) -> Result<ValidationReport, ValidationError> {
    let file = File::open(path)?;
    validate_reader(BufReader::new(file), max_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GOOD: &str = r#"{"id":"1","instruction":"i","response":"r","pattern_type":"pinescript"}"#;
    const BAD_SOURCE: &str =
        r#"{"id":"2","instruction":"i","response":"r","pattern_type":"pinescript","source":"x"}"#;

    #[test]
    fn test_all_valid() {
        let text = format!("{GOOD}\n{GOOD}\n");
        let report = validate_text(&text, DEFAULT_MAX_ERRORS);
        assert!(report.valid);
        assert_eq!(report.valid_count, 2);
        assert_eq!(report.error_count, 0);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let text = format!("{GOOD}\nnot json\n{BAD_SOURCE}\n");
        let report = validate_text(&text, DEFAULT_MAX_ERRORS);
        assert!(!report.valid);
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.errors[0].line, 2);
        assert!(report.errors[0].field.is_none());
        assert_eq!(report.errors[1].line, 3);
        assert_eq!(report.errors[1].field.as_deref(), Some("source"));
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_the_pass() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(GOOD.as_bytes());
        bytes.extend_from_slice(b"\n\xff\xfe bad\n");
        bytes.extend_from_slice(GOOD.as_bytes());
        bytes.extend_from_slice(b"\r\n");

        let report = validate_reader(bytes.as_slice(), DEFAULT_MAX_ERRORS).expect("validate");
        assert_eq!(report.valid_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors[0].line, 2);
        assert!(report.errors[0].reason.contains("UTF-8"));
    }

    #[test]
    fn test_error_list_is_capped() {
        let text = "garbage\n".repeat(75);
        let report = validate_text(&text, DEFAULT_MAX_ERRORS);
        assert_eq!(report.error_count, 75);
        assert_eq!(report.errors.len(), DEFAULT_MAX_ERRORS);
        assert_eq!(report.total(), 75);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = format!("\n{GOOD}\n\n   \n{GOOD}");
        let report = validate_text(&text, DEFAULT_MAX_ERRORS);
        assert!(report.valid);
        assert_eq!(report.valid_count, 2);
    }

    #[test]
    fn test_validate_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{GOOD}").expect("write");
        writeln!(file, "{BAD_SOURCE}").expect("write");

        let report = validate_file(file.path(), 10).expect("validate");
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.error_count, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = validate_file(Path::new("/definitely/not/here.jsonl"), 10).unwrap_err();
        assert!(matches!(err, ValidationError::Io(_)));
    }
}
