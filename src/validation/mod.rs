//! Validation modules for trade-forge.
//!
//! This module provides schema validation for single training records and
//! streaming validation for whole dataset files.

pub mod file_validator;
pub mod schema_validator;

pub use file_validator::{
    validate_file, validate_reader, validate_text, LineError, ValidationReport, DEFAULT_MAX_ERRORS,
};
pub use schema_validator::SchemaValidator;
