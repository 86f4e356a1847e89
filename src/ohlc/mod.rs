//! Synthetic OHLC bars illustrating named price patterns.
//!
//! Bars are produced oldest first, spaced by a fixed interval and ending at
//! the anchor time. Each bar's close is the next bar's open unless the
//! pattern explicitly resets it. Prices are rounded to cents; rounding is
//! monotone, so `high >= max(open, close)` and `low <= min(open, close)`
//! survive it.

use chrono::{DateTime, Duration, Utc};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::generator::entropy_seed;

/// Shape the generated bar sequence follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OhlcPattern {
    Uptrend,
    Downtrend,
    Breakout,
    PinBar,
    Engulfing,
    RandomWalk,
}

impl OhlcPattern {
    /// Returns every supported pattern.
    pub fn all() -> [OhlcPattern; 6] {
        [
            OhlcPattern::Uptrend,
            OhlcPattern::Downtrend,
            OhlcPattern::Breakout,
            OhlcPattern::PinBar,
            OhlcPattern::Engulfing,
            OhlcPattern::RandomWalk,
        ]
    }

    /// Parses a pattern name. Unknown names fall back to a random walk.
    pub fn from_name(name: &str) -> Self {
        match name {
            "uptrend" => OhlcPattern::Uptrend,
            "downtrend" => OhlcPattern::Downtrend,
            "breakout" => OhlcPattern::Breakout,
            "pin_bar" => OhlcPattern::PinBar,
            "engulfing" => OhlcPattern::Engulfing,
            _ => OhlcPattern::RandomWalk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OhlcPattern::Uptrend => "uptrend",
            OhlcPattern::Downtrend => "downtrend",
            OhlcPattern::Breakout => "breakout",
            OhlcPattern::PinBar => "pin_bar",
            OhlcPattern::Engulfing => "engulfing",
            OhlcPattern::RandomWalk => "random_walk",
        }
    }
}

impl fmt::Display for OhlcPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single price bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcBar {
    /// True when high/low bracket the body.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// Unrounded, unstamped bar used while shaping a pattern.
#[derive(Debug, Clone, Copy)]
struct RawBar {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Generator for synthetic bar sequences.
#[derive(Debug, Clone)]
pub struct OhlcSynthesizer {
    interval: Duration,
}

impl Default for OhlcSynthesizer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl OhlcSynthesizer {
    /// Creates a synthesizer with bars spaced `interval_minutes` apart.
    pub fn new(interval_minutes: i64) -> Self {
        Self {
            interval: Duration::minutes(interval_minutes),
        }
    }

    /// Generates `count` bars ending now. A missing seed is drawn from entropy.
    pub fn generate(&self, pattern: OhlcPattern, count: usize, seed: Option<u64>) -> Vec<OhlcBar> {
        let seed = seed.unwrap_or_else(entropy_seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with(pattern, count, &mut rng, Utc::now())
    }

    /// Generates `count` bars whose last bar starts one interval before `end`.
    pub fn generate_with(
        &self,
        pattern: OhlcPattern,
        count: usize,
        rng: &mut ChaCha8Rng,
        end: DateTime<Utc>,
    ) -> Vec<OhlcBar> {
        if count == 0 {
            return Vec::new();
        }

        let base = rng.random_range(100.0..500.0);
        let mut raw = match pattern {
            OhlcPattern::Uptrend => uptrend(rng, base, count),
            OhlcPattern::Downtrend => downtrend(rng, base, count),
            OhlcPattern::Breakout => breakout(rng, base, count),
            OhlcPattern::PinBar => pin_bar(rng, base, count),
            OhlcPattern::Engulfing => engulfing(rng, base, count),
            OhlcPattern::RandomWalk => random_walk(rng, base, count),
        };

        // Short sequences keep the tail of the pattern, which carries its signature.
        if raw.len() > count {
            raw.drain(..raw.len() - count);
        }

        // Stamped newest first; bars that would predate the representable
        // time range are dropped.
        let mut stamp = end;
        let mut bars: Vec<OhlcBar> = raw
            .into_iter()
            .rev()
            .map_while(|bar| {
                stamp = stamp.checked_sub_signed(self.interval)?;
                Some(OhlcBar {
                    timestamp: stamp,
                    open: cents(bar.open),
                    high: cents(bar.high),
                    low: cents(bar.low),
                    close: cents(bar.close),
                    volume: bar.volume,
                })
            })
            .collect();
        bars.reverse();
        bars
    }
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn uptrend(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let mut bars = Vec::with_capacity(n);
    let mut price = base;
    for _ in 0..n {
        let open = price;
        let close = open * rng.random_range(1.002..1.015);
        let high = close * rng.random_range(1.001..1.008);
        let low = open * rng.random_range(0.995..0.999);
        let volume = rng.random_range(10_000..50_000);
        bars.push(RawBar {
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }
    bars
}

fn downtrend(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let mut bars = Vec::with_capacity(n);
    let mut price = base;
    for _ in 0..n {
        let open = price;
        let close = open * rng.random_range(0.985..0.998);
        let high = open * rng.random_range(1.001..1.005);
        let low = close * rng.random_range(0.992..0.999);
        let volume = rng.random_range(10_000..50_000);
        bars.push(RawBar {
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }
    bars
}

/// Tight range around `base`, then three bars of ~2% expansion on 2-3x volume.
fn breakout(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let consolidation = n.saturating_sub(3);
    let mut bars = Vec::with_capacity(consolidation + 3);

    for _ in 0..consolidation {
        let open = base * rng.random_range(0.998..1.002);
        let close = base * rng.random_range(0.998..1.002);
        let high = open.max(close) * rng.random_range(1.001..1.003);
        let low = open.min(close) * rng.random_range(0.997..0.999);
        let volume = rng.random_range(10_000..30_000);
        bars.push(RawBar {
            open,
            high,
            low,
            close,
            volume,
        });
    }

    let reference_volume = if bars.is_empty() {
        20_000.0
    } else {
        bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64
    };

    let mut open = base;
    for _ in 0..3 {
        let close = open * 1.02;
        let volume = (reference_volume * rng.random_range(2.0..3.0)).round() as u64;
        bars.push(RawBar {
            open,
            high: close * 1.005,
            low: open * 0.998,
            close,
            volume,
        });
        open = close;
    }

    bars
}

/// Random walk ending in a bullish pin bar whose lower wick is ~30x its body.
fn pin_bar(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let mut bars = random_walk(rng, base, n.saturating_sub(1));
    let open = bars.last().map(|b| b.close).unwrap_or(base);
    let close = open * 1.001;
    bars.push(RawBar {
        open,
        high: close * 1.002,
        low: open * 0.97,
        close,
        volume: rng.random_range(30_000..60_000),
    });
    bars
}

/// Random walk ending in a small bearish bar engulfed by a larger bullish bar.
fn engulfing(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let mut bars = random_walk(rng, base, n.saturating_sub(2));
    let open1 = bars.last().map(|b| b.close).unwrap_or(base);
    let close1 = open1 * 0.995;
    bars.push(RawBar {
        open: open1,
        high: open1 * 1.002,
        low: close1 * 0.998,
        close: close1,
        volume: rng.random_range(20_000..40_000),
    });

    let open2 = close1 * 0.998;
    let close2 = open1 * 1.01;
    bars.push(RawBar {
        open: open2,
        high: close2 * 1.003,
        low: open2 * 0.997,
        close: close2,
        volume: rng.random_range(50_000..80_000),
    });
    bars
}

fn random_walk(rng: &mut ChaCha8Rng, base: f64, n: usize) -> Vec<RawBar> {
    let mut bars = Vec::with_capacity(n);
    let mut price = base;
    for _ in 0..n {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let open = price;
        let close = open * (1.0 + direction * rng.random_range(0.002..0.01));
        let high = open.max(close) * rng.random_range(1.001..1.005);
        let low = open.min(close) * rng.random_range(0.995..0.999);
        let volume = rng.random_range(10_000..50_000);
        bars.push(RawBar {
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn bars(pattern: OhlcPattern, count: usize, seed: u64) -> Vec<OhlcBar> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        OhlcSynthesizer::default().generate_with(pattern, count, &mut rng, anchor())
    }

    #[test]
    fn test_unknown_pattern_falls_back() {
        assert_eq!(OhlcPattern::from_name("head_and_shoulders"), OhlcPattern::RandomWalk);
        assert_eq!(OhlcPattern::from_name("pin_bar"), OhlcPattern::PinBar);
        for pattern in OhlcPattern::all() {
            assert_eq!(OhlcPattern::from_name(pattern.as_str()), pattern);
        }
    }

    #[test]
    fn test_bar_validity_all_patterns() {
        for pattern in OhlcPattern::all() {
            for count in [1, 5, 10, 50] {
                for seed in 0..20 {
                    let bars = bars(pattern, count, seed);
                    assert_eq!(bars.len(), count, "{pattern} x{count}");
                    for bar in &bars {
                        assert!(bar.is_consistent(), "{pattern} x{count} seed {seed}: {bar:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_bars_is_empty() {
        for pattern in OhlcPattern::all() {
            assert!(bars(pattern, 0, 1).is_empty());
        }
    }

    #[test]
    fn test_timestamps_evenly_spaced() {
        let bars = bars(OhlcPattern::Uptrend, 10, 3);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(5));
        }
        assert_eq!(
            bars.last().expect("bars").timestamp,
            anchor() - Duration::minutes(5)
        );
    }

    #[test]
    fn test_bars_stop_at_earliest_timestamp() {
        let end = DateTime::<Utc>::MIN_UTC + Duration::minutes(15);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let bars = OhlcSynthesizer::default().generate_with(OhlcPattern::Uptrend, 10, &mut rng, end);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_trend_continuity() {
        for pattern in [OhlcPattern::Uptrend, OhlcPattern::Downtrend, OhlcPattern::RandomWalk] {
            let bars = bars(pattern, 20, 11);
            for pair in bars.windows(2) {
                assert_eq!(pair[1].open, pair[0].close);
            }
        }
        let up = bars(OhlcPattern::Uptrend, 20, 11);
        assert!(up.iter().all(|b| b.close > b.open));
        let down = bars(OhlcPattern::Downtrend, 20, 11);
        assert!(down.iter().all(|b| b.close < b.open));
    }

    #[test]
    fn test_breakout_shape() {
        let bars = bars(OhlcPattern::Breakout, 10, 21);
        let (consolidation, breakout) = bars.split_at(7);
        let avg_volume =
            consolidation.iter().map(|b| b.volume as f64).sum::<f64>() / consolidation.len() as f64;

        for bar in breakout {
            let change = bar.close / bar.open - 1.0;
            assert!((0.0195..0.0205).contains(&change), "change {change}");
            let ratio = bar.volume as f64 / avg_volume;
            assert!((1.99..=3.01).contains(&ratio), "volume ratio {ratio}");
        }
        assert_eq!(breakout[1].open, breakout[0].close);
    }

    #[test]
    fn test_pin_bar_long_wick() {
        for seed in 0..20 {
            let bars = bars(OhlcPattern::PinBar, 10, seed);
            let pin = bars.last().expect("bars");
            let body = (pin.close - pin.open).abs();
            let wick = pin.open.min(pin.close) - pin.low;
            assert!(wick >= body * 20.0, "wick {wick} body {body}");
        }
    }

    #[test]
    fn test_engulfing_contains_prior_body() {
        for seed in 0..20 {
            let bars = bars(OhlcPattern::Engulfing, 10, seed);
            let prior = &bars[8];
            let engulf = &bars[9];
            assert!(prior.close < prior.open);
            assert!(engulf.close > engulf.open);
            assert!(engulf.open <= prior.close);
            assert!(engulf.close >= prior.open);
        }
    }

    #[test]
    fn test_seeded_generation_repeats() {
        let a = bars(OhlcPattern::RandomWalk, 15, 77);
        let b = bars(OhlcPattern::RandomWalk, 15, 77);
        assert_eq!(a, b);
    }
}
