//! Indicator implementations.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! returns a series the same length as its input whose first `lookback()`
//! values are `f64::NAN` (warmup). The analysis engine only reads the last
//! two points of each series and rejects windows too short to fill them.
//!
//! Pivot levels are a single-point calculation over the whole window and
//! live alongside the series indicators.

pub mod ema;
pub mod pivot;
pub mod rsi;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use pivot::PivotLevels;
pub use rsi::Rsi;
pub use sma::VolumeSma;

use crate::domain::Bar;

/// Trait for series indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_9", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars that produce no valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic one-minute bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc
        .with_ymd_and_hms(2024, 1, 2, 14, 30, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
