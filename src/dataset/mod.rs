//! Dataset records, assembly and statistics.

pub mod assembler;
pub mod record;
pub mod stats;

pub use assembler::{AssembledDataset, CategoryWeights, DatasetAssembler};
pub use record::{RecordSource, TrainingExample};
pub use stats::{DatasetStats, PatternCount};
