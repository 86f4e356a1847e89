//! Dataset assembly.
//!
//! Builds a full dataset from a size, a category split and a top-level seed.
//! All draws (per-record sub-seeds and the final shuffle) come from one
//! random source seeded with the top-level seed, so the order of those draws
//! is part of the reproducibility contract.

use std::collections::BTreeMap;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::categories::Category;
use crate::error::GeneratorError;
use crate::generator::{entropy_seed, Result, SampleGenerator, MAX_SEED};
use crate::template::TemplateBank;
use crate::validation::SchemaValidator;

use super::record::TrainingExample;

/// How the requested size is split across categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoryWeights {
    /// Equal thirds.
    #[default]
    Balanced,
    /// Percentages per category; they need not sum to 100.
    Percentages {
        pinescript: u32,
        price_action: u32,
        institutional: u32,
    },
}

impl CategoryWeights {
    pub fn explicit(pinescript: u32, price_action: u32, institutional: u32) -> Self {
        Self::Percentages {
            pinescript,
            price_action,
            institutional,
        }
    }

    /// The 30/40/30 split used when weights are not balanced and not given.
    pub fn default_split() -> Self {
        Self::explicit(
            Category::Pinescript.default_weight(),
            Category::PriceAction.default_weight(),
            Category::Institutional.default_weight(),
        )
    }

    /// Builds weights from the request flags shared by the CLI and the API.
    pub fn from_request(balance: bool, pinescript: u32, price_action: u32, institutional: u32) -> Self {
        if balance {
            Self::Balanced
        } else {
            Self::explicit(pinescript, price_action, institutional)
        }
    }

    pub fn weight(&self, category: Category) -> Option<u32> {
        match self {
            Self::Balanced => None,
            Self::Percentages {
                pinescript,
                price_action,
                institutional,
            } => Some(match category {
                Category::Pinescript => *pinescript,
                Category::PriceAction => *price_action,
                Category::Institutional => *institutional,
            }),
        }
    }

    /// Per-category target counts for `total` records.
    ///
    /// Counts are truncated and the remainder is not redistributed, so the
    /// sum may fall short of `total`. Balanced mode is an exact `total / 3`
    /// rather than a 33.33% weight, so 300 balanced records give 100 per
    /// category, not 99. Counts too large for `usize` saturate.
    pub fn counts(&self, total: usize) -> BTreeMap<Category, usize> {
        Category::all()
            .into_iter()
            .map(|category| {
                let count = match self.weight(category) {
                    None => total / 3,
                    Some(w) => {
                        let scaled = total as u128 * u128::from(w) / 100;
                        usize::try_from(scaled).unwrap_or(usize::MAX)
                    }
                };
                (category, count)
            })
            .collect()
    }

    /// Number of records `counts(total)` asks for, saturating at `usize::MAX`.
    pub fn planned_total(&self, total: usize) -> usize {
        self.counts(total)
            .values()
            .fold(0usize, |acc, n| acc.saturating_add(*n))
    }
}

/// Output of one assembly run.
#[derive(Debug, Clone)]
pub struct AssembledDataset {
    /// Records in shuffled order.
    pub records: Vec<TrainingExample>,
    /// Realized count per category.
    pub distribution: BTreeMap<Category, usize>,
    /// Seed that reproduces this dataset.
    pub seed_used: u64,
}

impl AssembledDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distribution keyed by category name, as reported to callers.
    pub fn distribution_by_name(&self) -> BTreeMap<String, usize> {
        self.distribution
            .iter()
            .map(|(c, n)| (c.as_str().to_string(), *n))
            .collect()
    }
}

/// Assembles datasets from the template bank.
pub struct DatasetAssembler<'b> {
    generator: SampleGenerator<'b>,
    max_records: Option<usize>,
}

impl<'b> DatasetAssembler<'b> {
    pub fn new(bank: &'b TemplateBank) -> Self {
        Self {
            generator: SampleGenerator::new(bank),
            max_records: None,
        }
    }

    /// Rejects requests that would produce more than `limit` records.
    pub fn with_max_records(mut self, limit: usize) -> Self {
        self.max_records = Some(limit);
        self
    }

    fn check_limit(&self, size: usize, weights: &CategoryWeights) -> Result<()> {
        let Some(limit) = self.max_records else {
            return Ok(());
        };
        let requested = size.max(weights.planned_total(size));
        if requested > limit {
            return Err(GeneratorError::LimitExceeded { requested, limit });
        }
        Ok(())
    }

    /// Assembles `size` records split by `weights`.
    ///
    /// A seed of `None` or `Some(0)` draws one from entropy; the seed actually
    /// used is returned. Categories are generated in their canonical order,
    /// each record from a sub-seed drawn off the shared source, and the whole
    /// collection is shuffled with the same source at the end.
    pub fn assemble(
        &self,
        size: usize,
        weights: &CategoryWeights,
        seed: Option<u64>,
    ) -> Result<AssembledDataset> {
        self.check_limit(size, weights)?;

        let seed_used = match seed {
            Some(s) if s != 0 => s,
            _ => entropy_seed(),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed_used);
        let targets = weights.counts(size);

        info!(size, seed = seed_used, ?targets, "Assembling dataset");

        let mut records = Vec::with_capacity(targets.values().sum());
        let mut distribution = BTreeMap::new();

        for (category, count) in targets {
            for _ in 0..count {
                let sub_seed = rng.random_range(0..=MAX_SEED);
                let sample = self.generator.generate(category, sub_seed)?;
                let record = TrainingExample::from_sample(sample, sub_seed);
                SchemaValidator::validate_example(&record)?;
                records.push(record);
            }
            debug!(category = %category, count, "Generated category records");
            distribution.insert(category, count);
        }

        records.shuffle(&mut rng);

        info!(
            generated = records.len(),
            requested = size,
            "Dataset assembled"
        );

        Ok(AssembledDataset {
            records,
            distribution,
            seed_used,
        })
    }
}
