//! Sample generation pipeline for trade-forge.
//!
//! One generation call performs, in order and against a single random source:
//!
//! 1. **Template selection** - one uniform draw over the category's bank
//! 2. **Parameter synthesis** - the category's synthesizer fills every placeholder
//! 3. **Interpolation** - instruction and response are rendered from the parameters
//!
//! The result is a partial record; ids, timestamps and defaults are added by
//! the dataset assembler.
//!
//! # Example
//!
//! ```ignore
//! use trade_forge::generator::SampleGenerator;
//! use trade_forge::template::TemplateBank;
//! use trade_forge::categories::Category;
//!
//! let bank = TemplateBank::load()?;
//! let generator = SampleGenerator::new(&bank);
//! let sample = generator.generate(Category::Pinescript, 42)?;
//! println!("{}", sample.instruction);
//! ```

pub mod sampler;

pub use sampler::{synthesizer_for, ParameterSet, ParameterSynthesizer};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::error::GeneratorError;
use crate::template::TemplateBank;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Upper bound for seeds drawn from entropy or derived per record.
pub const MAX_SEED: u64 = 1_000_000;

/// Audit trail of how a sample was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    /// Name of the chosen template.
    pub template: String,
    /// Every synthesized parameter, including derived ones.
    pub params: ParameterSet,
}

/// A generated sample before it is wrapped into a full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSample {
    pub instruction: String,
    pub response: String,
    pub pattern_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    pub metadata: SampleMetadata,
}

/// Generates samples from the template bank.
pub struct SampleGenerator<'b> {
    bank: &'b TemplateBank,
}

impl<'b> SampleGenerator<'b> {
    /// Creates a generator over a loaded bank.
    pub fn new(bank: &'b TemplateBank) -> Self {
        Self { bank }
    }

    /// Generates one sample from a fresh source seeded with exactly `seed`.
    ///
    /// Seeding is absolute: the output does not depend on any earlier call.
    pub fn generate(&self, category: Category, seed: u64) -> Result<GeneratedSample> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with_rng(category, &mut rng)
    }

    /// Generates one sample, drawing from the caller's random source.
    pub fn generate_with_rng(
        &self,
        category: Category,
        rng: &mut ChaCha8Rng,
    ) -> Result<GeneratedSample> {
        let template = self.bank.choose(category, rng)?;
        let params = synthesizer_for(category).synthesize(&template.name, rng);
        let (instruction, response) = self.bank.render(template, &params)?;

        let timeframe = match category {
            Category::PriceAction => params
                .get("timeframe")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        };

        Ok(GeneratedSample {
            instruction,
            response,
            pattern_type: category.as_str().to_string(),
            timeframe,
            metadata: SampleMetadata {
                template: template.name.clone(),
                params,
            },
        })
    }

    /// Generates a preview sample, drawing a seed from entropy when none is given.
    ///
    /// Returns the sample together with the seed that reproduces it.
    pub fn preview(&self, category: Category, seed: Option<u64>) -> Result<(GeneratedSample, u64)> {
        let seed = seed.unwrap_or_else(entropy_seed);
        Ok((self.generate(category, seed)?, seed))
    }
}

/// Draws a fresh seed in `[1, MAX_SEED]` from system entropy.
pub fn entropy_seed() -> u64 {
    rand::rng().random_range(1..=MAX_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> TemplateBank {
        TemplateBank::load().expect("bank should load")
    }

    #[test]
    fn test_generate_deterministic() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        for category in Category::all() {
            let a = generator.generate(category, 42).expect("generate");
            let b = generator.generate(category, 42).expect("generate");
            assert_eq!(a, b);
            assert_eq!(
                serde_json::to_string(&a.metadata).expect("serialize"),
                serde_json::to_string(&b.metadata).expect("serialize")
            );
        }
    }

    #[test]
    fn test_seeding_is_absolute() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        let first = generator.generate(Category::Institutional, 99).expect("generate");

        // Unrelated generation in between must not change the outcome.
        for seed in 0..5 {
            generator
                .generate(Category::Pinescript, seed)
                .expect("generate");
        }

        let second = generator.generate(Category::Institutional, 99).expect("generate");
        assert_eq!(first, second);
    }

    /// Seed 42 recorded against ChaCha8 with `rand` 0.10 range sampling.
    ///
    /// These values differ from fixtures recorded with other random sources
    /// (which pick `EMA_Crossover` for seed 42); any change to the random
    /// source or to the draw order breaks this test.
    #[test]
    fn test_seed_42_pinescript_fixture() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        let sample = generator.generate(Category::Pinescript, 42).expect("generate");

        assert_eq!(sample.pattern_type, "pinescript");
        assert_eq!(sample.metadata.template, "RSI_EMA");

        let params = &sample.metadata.params;
        assert_eq!(params["fast_len"], 10);
        assert_eq!(params["slow_len"], 166);
        assert_eq!(params["rsi_len"], 14);
        assert_eq!(params["ema_len"], 79);
        assert_eq!(params["oversold"], 30);
        assert_eq!(params["overbought"], 70);

        assert_eq!(
            sample.instruction,
            "Create a PineScript v5 strategy combining RSI(14) and EMA(79) with oversold at 30 and overbought at 70"
        );
        assert!(sample
            .response
            .contains("rsiLen = input.int(14, \"RSI Length\")"));
        assert!(sample
            .response
            .contains("emaLen = input.int(79, \"EMA Length\")"));
    }

    #[test]
    fn test_price_action_carries_timeframe() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        let sample = generator.generate(Category::PriceAction, 5).expect("generate");
        let expected = sample.metadata.params["timeframe"].as_str().map(str::to_string);
        assert_eq!(sample.timeframe, expected);

        let pine = generator.generate(Category::Pinescript, 5).expect("generate");
        assert!(pine.timeframe.is_none());
    }

    #[test]
    fn test_placeholder_completeness_over_seeds() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        for category in Category::all() {
            for seed in 0..150 {
                let sample = generator
                    .generate(category, seed)
                    .unwrap_or_else(|e| panic!("{category} seed {seed}: {e}"));
                assert!(!sample.instruction.is_empty());
                assert!(!sample.response.is_empty());
                assert!(!sample.instruction.contains("{{"));
                assert!(!sample.response.contains("{{"));
            }
        }
    }

    #[test]
    fn test_every_template_is_reachable() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        for category in Category::all() {
            let mut seen = std::collections::BTreeSet::new();
            for seed in 0..500 {
                let sample = generator.generate(category, seed).expect("generate");
                seen.insert(sample.metadata.template);
            }
            assert_eq!(seen.len(), bank.templates(category).len());
        }
    }

    #[test]
    fn test_preview_reports_seed() {
        let bank = bank();
        let generator = SampleGenerator::new(&bank);
        let (sample, seed) = generator
            .preview(Category::PriceAction, None)
            .expect("preview");
        assert!((1..=MAX_SEED).contains(&seed));
        let again = generator.generate(Category::PriceAction, seed).expect("generate");
        assert_eq!(sample, again);
    }
}
