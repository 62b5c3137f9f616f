//! Volume Simple Moving Average.
//!
//! Rolling mean of bar volume over a lookback window that includes the
//! current bar. Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

        let mut sum: f64 = volumes[..self.period].iter().sum();
        result[self.period - 1] = sum / self.period as f64;

        // Roll the window forward
        for i in self.period..n {
            sum += volumes[i] - volumes[i - self.period];
            result[i] = sum / self.period as f64;
        }

        result
    }
}
