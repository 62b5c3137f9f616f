//! Relative Strength Index (RSI).
//!
//! Simple trailing means of gains and losses over the last `period` close
//! deltas. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period (first delta is undefined).
//! Edge case: avg_loss == 0 → RSI = 100, including a perfectly flat window.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // changes[i] is the move into bar i + 1
        let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

        // Each window is summed from scratch so that a window with no losses
        // sums to exactly zero instead of a rolling-subtraction residue.
        for i in self.period..n {
            let window = &changes[i - self.period..i];
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            for &ch in window {
                if ch > 0.0 {
                    gain_sum += ch;
                } else if ch < 0.0 {
                    loss_sum -= ch;
                }
            }
            let period = self.period as f64;
            result[i] = compute_rsi(gain_sum / period, loss_sum / period);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
