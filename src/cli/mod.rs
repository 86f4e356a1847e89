//! Command-line interface for trade-forge.
//!
//! Provides commands for dataset generation, previews, validation,
//! statistics, listing and serving the HTTP API.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
