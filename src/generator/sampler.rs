//! Parameter synthesis for record generation.
//!
//! Each category has a synthesizer that draws every parameter any of its
//! templates may reference. All draws go through the caller's `ChaCha8Rng`
//! in a fixed order, so the same generator state always yields the same
//! parameter set. Derived values (net flow, totals, amounts that follow a
//! drawn action) are computed from already-drawn values and never redrawn.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::categories::Category;

/// Placeholder name to concrete value. Ordered so serialized output is stable.
pub type ParameterSet = BTreeMap<String, Value>;

/// Produces the parameter set for one category.
pub trait ParameterSynthesizer: Send + Sync {
    /// Category this synthesizer serves.
    fn category(&self) -> Category;

    /// Every key `synthesize` inserts, regardless of template.
    fn supplied_keys(&self) -> &'static [&'static str];

    /// Draws a fresh parameter set for the chosen template.
    fn synthesize(&self, template: &str, rng: &mut ChaCha8Rng) -> ParameterSet;
}

/// Returns the synthesizer for a category.
pub fn synthesizer_for(category: Category) -> &'static dyn ParameterSynthesizer {
    match category {
        Category::Pinescript => &PinescriptSynthesizer,
        Category::PriceAction => &PriceActionSynthesizer,
        Category::Institutional => &InstitutionalSynthesizer,
    }
}

/// Sampling helper that records every drawn or derived value by name.
struct ParameterSampler<'r> {
    rng: &'r mut ChaCha8Rng,
    resolved: ParameterSet,
}

impl<'r> ParameterSampler<'r> {
    fn new(rng: &'r mut ChaCha8Rng) -> Self {
        Self {
            rng,
            resolved: ParameterSet::new(),
        }
    }

    /// Uniform integer in `[min, max]`.
    fn int(&mut self, name: &str, min: i64, max: i64) -> i64 {
        let value = self.rng.random_range(min..=max);
        self.resolved.insert(name.to_string(), Value::from(value));
        value
    }

    /// Uniform float in `[min, max)` rounded to `decimals` places.
    fn float(&mut self, name: &str, min: f64, max: f64, decimals: i32) -> f64 {
        let value = round_to(self.rng.random_range(min..max), decimals);
        self.resolved.insert(name.to_string(), float_value(value));
        value
    }

    /// Uniform pick from a fixed set.
    fn choice(&mut self, name: &str, choices: &[&'static str]) -> &'static str {
        let value = self.pick(choices);
        self.resolved
            .insert(name.to_string(), Value::String(value.to_string()));
        value
    }

    /// Uniform pick without recording the value.
    fn pick(&mut self, choices: &[&'static str]) -> &'static str {
        choices[self.rng.random_range(0..choices.len())]
    }

    /// `count` distinct picks, in draw order, without replacement.
    fn distinct(&mut self, choices: &[&'static str], count: usize) -> Vec<&'static str> {
        let mut pool = choices.to_vec();
        let mut picked = Vec::with_capacity(count.min(pool.len()));
        for _ in 0..count.min(choices.len()) {
            let idx = self.rng.random_range(0..pool.len());
            picked.push(pool.swap_remove(idx));
        }
        picked
    }

    /// Records a value computed from earlier draws.
    fn derived(&mut self, name: &str, value: impl Into<Value>) {
        self.resolved.insert(name.to_string(), value.into());
    }

    fn finish(self) -> ParameterSet {
        self.resolved
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// ============================================================================
// PineScript
// ============================================================================

/// Strategy parameters for PineScript templates.
pub struct PinescriptSynthesizer;

const PINESCRIPT_KEYS: &[&str] = &[
    "fast_len",
    "slow_len",
    "rsi_len",
    "ema_len",
    "oversold",
    "overbought",
    "bb_len",
    "bb_mult",
    "tp_pct",
    "sl_pct",
    "htf",
    "htf_len",
];

const HIGHER_TIMEFRAMES: &[&str] = &["15", "60", "240", "D"];

impl ParameterSynthesizer for PinescriptSynthesizer {
    fn category(&self) -> Category {
        Category::Pinescript
    }

    fn supplied_keys(&self) -> &'static [&'static str] {
        PINESCRIPT_KEYS
    }

    fn synthesize(&self, _template: &str, rng: &mut ChaCha8Rng) -> ParameterSet {
        let mut s = ParameterSampler::new(rng);
        s.int("fast_len", 8, 21);
        s.int("slow_len", 50, 200);
        s.int("rsi_len", 10, 21);
        s.int("ema_len", 20, 100);
        s.int("oversold", 20, 35);
        s.int("overbought", 65, 80);
        s.int("bb_len", 15, 25);
        s.float("bb_mult", 1.5, 2.5, 1);
        s.float("tp_pct", 0.5, 3.0, 2);
        s.float("sl_pct", 0.3, 2.0, 2);
        s.choice("htf", HIGHER_TIMEFRAMES);
        s.int("htf_len", 20, 50);
        s.finish()
    }
}

// ============================================================================
// Price action
// ============================================================================

/// Level and context parameters for price action templates.
pub struct PriceActionSynthesizer;

const PRICE_ACTION_KEYS: &[&str] = &[
    "price",
    "timeframe",
    "pattern_type",
    "level",
    "location",
    "direction",
    "start",
    "end",
];

/// Chart timeframes a price action record may be tagged with.
pub const TIMEFRAMES: &[&str] = &["5m", "15m", "1h", "4h", "1D"];
const CONSOLIDATION_SHAPES: &[&str] = &["triangle", "rectangle", "channel", "wedge"];
const LOCATIONS: &[&str] = &["support", "resistance", "key level", "trendline"];
const DIRECTIONS: &[&str] = &["Bullish", "Bearish"];

impl ParameterSynthesizer for PriceActionSynthesizer {
    fn category(&self) -> Category {
        Category::PriceAction
    }

    fn supplied_keys(&self) -> &'static [&'static str] {
        PRICE_ACTION_KEYS
    }

    fn synthesize(&self, _template: &str, rng: &mut ChaCha8Rng) -> ParameterSet {
        let mut s = ParameterSampler::new(rng);
        s.float("price", 100.0, 500.0, 2);
        s.choice("timeframe", TIMEFRAMES);
        s.choice("pattern_type", CONSOLIDATION_SHAPES);
        s.float("level", 100.0, 500.0, 2);
        s.choice("location", LOCATIONS);
        s.choice("direction", DIRECTIONS);
        s.float("start", 100.0, 300.0, 2);
        s.float("end", 300.0, 500.0, 2);
        s.finish()
    }
}

// ============================================================================
// Institutional flow
// ============================================================================

/// FII/DII flow figures for institutional templates.
pub struct InstitutionalSynthesizer;

const INSTITUTIONAL_KEYS: &[&str] = &[
    "fii_buy",
    "fii_sell",
    "dii_buy",
    "dii_sell",
    "fii_action",
    "dii_action",
    "fii_amt",
    "dii_amt",
    "net_flow",
    "total_outflow",
    "total_inflow",
    "date",
    "sector",
    "sectors",
    "sentiment",
    "market_action",
];

const FLOW_ACTIONS: &[&str] = &["bought", "sold"];
const SECTORS: &[&str] = &["IT", "Banking", "Pharma", "Auto", "Metal", "FMCG"];
const HEADLINE_SECTORS: &[&str] = &["IT", "Banking", "Pharma", "Auto", "Energy"];

/// Sentiment and expected market action implied by each flow template.
fn flow_outlook(template: &str) -> (&'static str, &'static str) {
    match template {
        "FII_Buying" => ("Bullish", "upside in growth stocks"),
        "DII_Support" => ("Cautiously Bullish", "range-bound consolidation"),
        "Dual_Selling" => ("Bearish", "correction or downtrend"),
        "Dual_Buying" => ("Strongly Bullish", "strong rally across indices"),
        "Mixed_Flow" => ("Neutral to Mixed", "sector-specific moves"),
        _ => ("Mixed", "mixed moves"),
    }
}

impl ParameterSynthesizer for InstitutionalSynthesizer {
    fn category(&self) -> Category {
        Category::Institutional
    }

    fn supplied_keys(&self) -> &'static [&'static str] {
        INSTITUTIONAL_KEYS
    }

    fn synthesize(&self, template: &str, rng: &mut ChaCha8Rng) -> ParameterSet {
        let mut s = ParameterSampler::new(rng);

        let fii_buy = s.int("fii_buy", 500, 5000);
        let fii_sell = s.int("fii_sell", 500, 5000);
        let dii_buy = s.int("dii_buy", 300, 4000);
        let dii_sell = s.int("dii_sell", 300, 4000);

        let fii_action = s.choice("fii_action", FLOW_ACTIONS);
        let dii_action = s.choice("dii_action", FLOW_ACTIONS);
        s.derived(
            "fii_amt",
            if fii_action == "bought" { fii_buy } else { fii_sell },
        );
        s.derived(
            "dii_amt",
            if dii_action == "bought" { dii_buy } else { dii_sell },
        );

        let net_flow = if template == "FII_Buying" {
            fii_buy - dii_sell
        } else {
            dii_buy - fii_sell
        };
        s.derived("net_flow", net_flow);
        s.derived("total_outflow", fii_sell + dii_sell);
        s.derived("total_inflow", fii_buy + dii_buy);

        let month: i64 = s.rng.random_range(1..=12);
        let day: i64 = s.rng.random_range(1..=28);
        s.derived("date", format!("2024-{:02}-{:02}", month, day));

        s.choice("sector", SECTORS);
        let sectors = s.distinct(HEADLINE_SECTORS, 2).join(", ");
        s.derived("sectors", sectors);

        let (sentiment, market_action) = flow_outlook(template);
        s.derived("sentiment", sentiment);
        s.derived("market_action", market_action);

        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_synthesizer_deterministic() {
        for category in Category::all() {
            let synth = synthesizer_for(category);
            let a = synth.synthesize("Any", &mut rng(42));
            let b = synth.synthesize("Any", &mut rng(42));
            assert_eq!(a, b, "category {category} should be deterministic");
        }
    }

    #[test]
    fn test_supplied_keys_match_output() {
        for category in Category::all() {
            let synth = synthesizer_for(category);
            assert_eq!(synth.category(), category);
            let params = synth.synthesize("Mixed_Flow", &mut rng(7));
            let mut produced: Vec<&str> = params.keys().map(String::as_str).collect();
            let mut declared = synth.supplied_keys().to_vec();
            produced.sort_unstable();
            declared.sort_unstable();
            assert_eq!(produced, declared);
        }
    }

    #[test]
    fn test_pinescript_ranges() {
        for seed in 0..200 {
            let params = PinescriptSynthesizer.synthesize("EMA_Crossover", &mut rng(seed));
            let fast = params["fast_len"].as_i64().expect("int");
            let slow = params["slow_len"].as_i64().expect("int");
            assert!((8..=21).contains(&fast));
            assert!((50..=200).contains(&slow));

            let mult = params["bb_mult"].as_f64().expect("float");
            assert!((1.5..=2.5).contains(&mult));
            assert_eq!(round_to(mult, 1), mult);

            let htf = params["htf"].as_str().expect("string");
            assert!(HIGHER_TIMEFRAMES.contains(&htf));
        }
    }

    #[test]
    fn test_price_action_ranges() {
        for seed in 0..200 {
            let params = PriceActionSynthesizer.synthesize("Retest", &mut rng(seed));
            let price = params["price"].as_f64().expect("float");
            assert!((100.0..=500.0).contains(&price));
            let start = params["start"].as_f64().expect("float");
            let end = params["end"].as_f64().expect("float");
            assert!(start <= end);
            let tf = params["timeframe"].as_str().expect("string");
            assert!(TIMEFRAMES.contains(&tf));
        }
    }

    #[test]
    fn test_institutional_derived_values_consistent() {
        for seed in 0..200 {
            for template in ["FII_Buying", "DII_Support", "Mixed_Flow"] {
                let p = InstitutionalSynthesizer.synthesize(template, &mut rng(seed));
                let get = |k: &str| p[k].as_i64().expect("int");

                let expected_net = if template == "FII_Buying" {
                    get("fii_buy") - get("dii_sell")
                } else {
                    get("dii_buy") - get("fii_sell")
                };
                assert_eq!(get("net_flow"), expected_net);
                assert_eq!(get("total_outflow"), get("fii_sell") + get("dii_sell"));
                assert_eq!(get("total_inflow"), get("fii_buy") + get("dii_buy"));

                let fii_amt = if p["fii_action"] == "bought" {
                    get("fii_buy")
                } else {
                    get("fii_sell")
                };
                assert_eq!(get("fii_amt"), fii_amt);
            }
        }
    }

    #[test]
    fn test_sectors_distinct() {
        for seed in 0..200 {
            let p = InstitutionalSynthesizer.synthesize("FII_Buying", &mut rng(seed));
            let sectors = p["sectors"].as_str().expect("string");
            let parts: Vec<&str> = sectors.split(", ").collect();
            assert_eq!(parts.len(), 2);
            assert_ne!(parts[0], parts[1]);
            assert!(parts.iter().all(|s| HEADLINE_SECTORS.contains(s)));
        }
    }

    #[test]
    fn test_outlook_follows_template() {
        let p = InstitutionalSynthesizer.synthesize("Dual_Selling", &mut rng(1));
        assert_eq!(p["sentiment"], "Bearish");
        assert_eq!(p["market_action"], "correction or downtrend");
    }

    #[test]
    fn test_date_format() {
        let p = InstitutionalSynthesizer.synthesize("FII_Buying", &mut rng(3));
        let date = p["date"].as_str().expect("string");
        assert_eq!(date.len(), 10);
        assert!(date.starts_with("2024-"));
    }
}
