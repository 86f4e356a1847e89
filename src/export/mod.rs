//! Dataset file export.
//!
//! Provides atomic JSONL writes, reads, safe file naming and listing of the
//! datasets directory.

pub mod jsonl;
pub mod listing;

pub use jsonl::{
    count_records, dataset_path, default_filename, read_jsonl, sanitize_filename, write_jsonl,
    DATASET_EXTENSION,
};
pub use listing::{list_datasets, DatasetInfo};
