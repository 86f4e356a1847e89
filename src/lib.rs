//! trade-forge: Seeded synthetic trading datasets for LLM fine-tuning.
//!
//! This library generates instruction/response pairs for three trading
//! categories (PineScript strategies, price action, institutional flow),
//! synthetic OHLC bar sequences, and validates, exports and lists the
//! resulting JSONL datasets.

// Core modules
pub mod api;
pub mod categories;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod generator;
pub mod ohlc;
pub mod template;
pub mod validation;

// Re-export commonly used error types
pub use config::{ConfigError, ForgeConfig};
pub use error::{ExportError, GeneratorError, TemplateError, ValidationError};
