//! Classic floor-trader pivot over a whole window.
//!
//! pivot = (window_high + window_low + latest_close) / 3
//! resistance = 2 * pivot - window_low
//! support = 2 * pivot - window_high

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: f64,
    pub resistance: f64,
    pub support: f64,
}

impl PivotLevels {
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        let pivot = (high + low + close) / 3.0;
        Self {
            pivot,
            resistance: 2.0 * pivot - low,
            support: 2.0 * pivot - high,
        }
    }

    /// Levels from the max high and min low of `bars` and the last close.
    /// `None` for an empty slice.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        let latest = bars.last()?;
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        Some(Self::new(high, low, latest.close))
    }

    /// True when `close` sits within the proximity band below (or above) resistance.
    pub fn is_near_resistance(&self, close: f64, fraction: f64) -> bool {
        close >= self.resistance * fraction
    }
}
