//! Trend direction and fast/slow EMA crossover detection.
//!
//! A crossover is a two-state transition between the previous and the latest
//! bar, so only the last two points of each EMA series are kept.

use serde::{Deserialize, Serialize};

use crate::indicators::ema_of_series;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    /// Fast EMA moved from at-or-below to strictly above the slow EMA.
    Golden,
    /// Fast EMA moved from at-or-above to strictly below the slow EMA.
    Death,
}

/// Fast and slow EMA at the previous and latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaPair {
    pub prev_fast: f64,
    pub prev_slow: f64,
    pub fast: f64,
    pub slow: f64,
}

impl EmaPair {
    /// Run both EMAs over `closes`. `None` with fewer than two closes.
    pub fn compute(closes: &[f64], fast_period: usize, slow_period: usize) -> Option<Self> {
        if closes.len() < 2 {
            return None;
        }
        let fast = ema_of_series(closes, fast_period);
        let slow = ema_of_series(closes, slow_period);
        let n = closes.len();
        Some(Self {
            prev_fast: fast[n - 2],
            prev_slow: slow[n - 2],
            fast: fast[n - 1],
            slow: slow[n - 1],
        })
    }

    /// Bullish only when fast is strictly above slow; equality is Bearish.
    pub fn trend(&self) -> Trend {
        if self.fast > self.slow {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }

    pub fn crossover(&self) -> Option<Crossover> {
        if self.prev_fast <= self.prev_slow && self.fast > self.slow {
            Some(Crossover::Golden)
        } else if self.prev_fast >= self.prev_slow && self.fast < self.slow {
            Some(Crossover::Death)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> EmaPair {
        EmaPair {
            prev_fast,
            prev_slow,
            fast,
            slow,
        }
    }

    #[test]
    fn equality_is_bearish() {
        assert_eq!(pair(1.0, 1.0, 5.0, 5.0).trend(), Trend::Bearish);
        assert_eq!(pair(1.0, 1.0, 5.1, 5.0).trend(), Trend::Bullish);
    }

    #[test]
    fn golden_from_touching() {
        assert_eq!(pair(5.0, 5.0, 5.1, 5.0).crossover(), Some(Crossover::Golden));
        assert_eq!(pair(4.9, 5.0, 5.1, 5.0).crossover(), Some(Crossover::Golden));
    }

    #[test]
    fn death_from_touching() {
        assert_eq!(pair(5.0, 5.0, 4.9, 5.0).crossover(), Some(Crossover::Death));
        assert_eq!(pair(5.1, 5.0, 4.9, 5.0).crossover(), Some(Crossover::Death));
    }

    #[test]
    fn staying_above_is_no_cross() {
        assert_eq!(pair(5.2, 5.0, 5.3, 5.0).crossover(), None);
        assert_eq!(pair(4.8, 5.0, 4.7, 5.0).crossover(), None);
        assert_eq!(pair(5.0, 5.0, 5.0, 5.0).crossover(), None);
    }

    #[test]
    fn three_bar_golden_cross_fires_once() {
        // Flat then a jump: fast reacts more than slow on the third bar only.
        let closes = [10.0, 10.0, 12.0];
        let at_bar2 = EmaPair::compute(&closes[..2], 2, 5).unwrap();
        let at_bar3 = EmaPair::compute(&closes, 2, 5).unwrap();
        assert_eq!(at_bar2.crossover(), None);
        assert_eq!(at_bar3.crossover(), Some(Crossover::Golden));
        assert_eq!(at_bar3.trend(), Trend::Bullish);
    }

    #[test]
    fn rising_series_stays_above_without_cross() {
        let closes = [10.0, 11.0, 12.0, 13.0];
        for end in 3..=closes.len() {
            let p = EmaPair::compute(&closes[..end], 2, 5).unwrap();
            assert!(p.prev_fast > p.prev_slow);
            assert_eq!(p.crossover(), None);
        }
    }

    #[test]
    fn too_short() {
        assert!(EmaPair::compute(&[1.0], 2, 5).is_none());
    }
}
