//! Summary statistics over a set of records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::TrainingExample;

/// Count of one value with its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCount {
    pub name: String,
    pub count: usize,
    /// Share of all records, in percent, rounded to one decimal.
    pub percent: f64,
}

/// Distribution of pattern types and timeframes in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total: usize,
    /// Sorted by count, most common first.
    pub patterns: Vec<PatternCount>,
    /// Only records that carry a timeframe are counted.
    pub timeframes: Vec<PatternCount>,
}

impl DatasetStats {
    pub fn compute(records: &[TrainingExample]) -> Self {
        let total = records.len();
        let patterns = tally(records.iter().map(|r| r.pattern_type.as_str()), total);
        let timeframes = tally(records.iter().filter_map(|r| r.timeframe.as_deref()), total);

        Self {
            total,
            patterns,
            timeframes,
        }
    }

    pub fn pattern_count(&self, name: &str) -> usize {
        self.patterns
            .iter()
            .find(|p| p.name == name)
            .map_or(0, |p| p.count)
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>, total: usize) -> Vec<PatternCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut out: Vec<PatternCount> = counts
        .into_iter()
        .map(|(name, count)| PatternCount {
            name: name.to_string(),
            count,
            percent: percent(count, total),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}
