//! Category taxonomy for trade-forge.
//!
//! Defines the three generated record categories and their wire names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GeneratorError;

/// The generated record categories.
///
/// The declaration order is the assembly order: all pinescript records are
/// generated first, then price action, then institutional flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// PineScript v5 strategy code.
    Pinescript,
    /// Price action pattern explanations.
    PriceAction,
    /// FII/DII institutional flow commentary.
    Institutional,
}

impl Category {
    /// Returns all categories in assembly order.
    pub fn all() -> [Category; 3] {
        [
            Category::Pinescript,
            Category::PriceAction,
            Category::Institutional,
        ]
    }

    /// Wire name, also used as the record's `pattern_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pinescript => "pinescript",
            Category::PriceAction => "price_action",
            Category::Institutional => "institutional",
        }
    }

    /// Human readable label for CLI summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Pinescript => "PineScript",
            Category::PriceAction => "Price Action",
            Category::Institutional => "Institutional",
        }
    }

    /// Default percentage weight when categories are not balanced.
    pub fn default_weight(&self) -> u32 {
        match self {
            Category::Pinescript => 30,
            Category::PriceAction => 40,
            Category::Institutional => 30,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pinescript" => Ok(Category::Pinescript),
            "price_action" => Ok(Category::PriceAction),
            "institutional" => Ok(Category::Institutional),
            other => Err(GeneratorError::InvalidCategory(other.to_string())),
        }
    }
}
