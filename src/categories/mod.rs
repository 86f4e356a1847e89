//! Category system for trade-forge datasets.
//!
//! Each category owns one template bank and one parameter synthesizer.

mod taxonomy;

pub use taxonomy::Category;
