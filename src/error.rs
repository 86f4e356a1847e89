//! Error types for trade-forge operations.
//!
//! Defines error types for each subsystem:
//! - Template bank loading and placeholder coverage
//! - Sample generation and interpolation
//! - Record schema validation
//! - Dataset export (filesystem, JSONL)

use thiserror::Error;

/// Errors that can occur while loading the template bank.
///
/// These are raised once at startup. Any of them means the bank and the
/// parameter synthesizers disagree, so no generation request may be served.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Duplicate template name '{name}' in category '{category}'")]
    DuplicateName { category: String, name: String },

    #[error("Category '{0}' has no templates")]
    EmptyCategory(String),

    #[error("Failed to parse template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Template '{template}' references placeholder '{placeholder}' that the {category} synthesizer never supplies")]
    UnsuppliedPlaceholder {
        category: String,
        template: String,
        placeholder: String,
    },

    #[error("Template '{0}' not found")]
    NotFound(String),
}

/// Errors that can occur during sample generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Interpolation of template '{template}' failed: {source}")]
    Interpolation {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Assembled record failed validation: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error("Request for {requested} records exceeds the limit of {limit}")]
    LimitExceeded { requested: usize, limit: usize },
}

/// Errors that can occur during record validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}': {reason}")]
    SchemaViolation { field: String, reason: String },

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidationError {
    /// Builds a schema violation for the given field.
    pub fn violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the offending field name, if the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid dataset filename '{0}': must be a plain file name")]
    InvalidFilename(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Failed to persist dataset file: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
