//! Synthetic bar source for offline runs and demos.
//!
//! Produces a random walk from a starting price of 100.0, seeded from the
//! symbol, interval and the window's end timestamp so repeated fetches for the
//! same moment are identical. These bars are clearly fake.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{BarSource, DataError};
use crate::domain::{Bar, BarWindow, Interval};

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    bars: usize,
    anchor: Option<DateTime<Utc>>,
}

impl SyntheticSource {
    /// Windows of `bars` bars ending at the current interval boundary.
    pub fn new(bars: usize) -> Self {
        Self { bars, anchor: None }
    }

    /// Windows ending at a fixed timestamp.
    pub fn with_anchor(bars: usize, anchor: DateTime<Utc>) -> Self {
        Self {
            bars,
            anchor: Some(anchor),
        }
    }

    fn end_timestamp(&self, interval: Interval) -> DateTime<Utc> {
        let now = self.anchor.unwrap_or_else(Utc::now);
        let secs = now.timestamp();
        let aligned = secs - secs.rem_euclid(interval.seconds());
        DateTime::<Utc>::from_timestamp(aligned, 0).unwrap_or(now)
    }
}

/// Generate `count` bars ending at `end`, one `interval` apart.
pub fn generate_bars(symbol: &str, interval: Interval, end: DateTime<Utc>, count: usize) -> Vec<Bar> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(interval.as_str().as_bytes());
    hasher.update(&end.timestamp().to_le_bytes());
    let seed: [u8; 32] = *hasher.finalize().as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let step = Duration::seconds(interval.seconds());
    let start = end - step * (count.saturating_sub(1) as i32);

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    for i in 0..count {
        let bar_return: f64 = rng.gen_range(-0.004..0.004);
        let open = price;
        let close = price * (1.0 + bar_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.001));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.001));
        let mut volume = rng.gen_range(1_000..5_000u64);
        if rng.gen_bool(0.05) {
            volume *= 4;
        }

        bars.push(Bar {
            timestamp: start + step * i as i32,
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

impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, interval: Interval) -> Result<BarWindow, DataError> {
        let end = self.end_timestamp(interval);
        let bars = generate_bars(symbol, interval, end, self.bars);
        Ok(BarWindow::new(symbol, interval, bars)?)
    }
}
