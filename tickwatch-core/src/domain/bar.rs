//! The OHLCV bar and the validated window of bars the analysis engine
//! consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Interval;

/// OHLCV bar for a single sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if every price field is finite and non-negative and the
    /// high/low range is not inverted.
    pub fn is_sane(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p >= 0.0) && self.high >= self.low
    }

    /// Percentage move from open to close. Zero when the open is zero.
    pub fn intraday_change_pct(&self) -> f64 {
        pct_change(self.open, self.close).unwrap_or(0.0)
    }
}

/// Percentage change from `from` to `to`, undefined when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}

/// Errors raised while building a [`BarWindow`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} has non-finite, negative or inverted prices")]
    InvalidPrices { index: usize },

    #[error("bar {index} timestamp {timestamp} is not after the previous bar")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Ordered bars for one instrument, strictly increasing by timestamp.
///
/// Gaps between bars are tolerated and not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarWindow {
    symbol: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl BarWindow {
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> Result<Self, BarError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(BarError::InvalidPrices { index });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(BarError::OutOfOrder {
                    index,
                    timestamp: bar.timestamp,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            interval,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Keep only the most recent `n` bars.
    pub fn tail(mut self, n: usize) -> Self {
        if self.bars.len() > n {
            self.bars.drain(..self.bars.len() - n);
        }
        self
    }
}
