//! Market-wide volatility proxy (e.g. the VIX index).
//!
//! Only the latest bar-to-bar change feeds the engine; the level is shown to
//! the user as context.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::provider::BarSource;
use crate::domain::{BarWindow, Interval};

/// Level reported when the gauge cannot be read.
pub const FALLBACK_LEVEL: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReading {
    pub level: f64,
    pub change: f64,
}

impl VolatilityReading {
    pub fn fallback() -> Self {
        Self {
            level: FALLBACK_LEVEL,
            change: 0.0,
        }
    }

    /// Reading from the last two closes; fallback with fewer than two bars.
    pub fn from_window(window: &BarWindow) -> Self {
        match window.bars() {
            [.., prev, last] => Self {
                level: last.close,
                change: last.close - prev.close,
            },
            _ => Self::fallback(),
        }
    }

    /// Fetch the gauge through `source`, degrading to the fallback on error.
    pub fn fetch(source: &dyn BarSource, symbol: &str, interval: Interval) -> Self {
        match source.fetch(symbol, interval) {
            Ok(window) => Self::from_window(&window),
            Err(e) => {
                warn!(symbol, error = %e, "volatility gauge unavailable, using fallback");
                Self::fallback()
            }
        }
    }

    pub fn is_rising(&self) -> bool {
        self.change > 0.0
    }
}
