//! Per-call analysis configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the two anomaly flags are decided.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyPolicy {
    #[default]
    /// Price move compared with a trimmed baseline of recent moves; volume
    /// compared with the volume moving average via `volume_anomaly_multiplier`.
    TrimmedBaseline,

    /// Absolute thresholds: `|bar-over-bar change| >= price_change_pct` and
    /// `volume ratio >= volume_ratio`.
    FixedThreshold {
        price_change_pct: f64,
        volume_ratio: f64,
    },
}

impl AnomalyPolicy {
    pub fn fixed_threshold_default() -> Self {
        AnomalyPolicy::FixedThreshold {
            price_change_pct: 0.5,
            volume_ratio: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0")]
    NonPositivePeriod { field: &'static str },

    #[error("ema_slow_period ({slow}) must be greater than ema_fast_period ({fast})")]
    SlowNotAboveFast { fast: usize, slow: usize },

    #[error("trim_window must be >= 3, got {0}")]
    TrimWindowTooSmall(usize),

    #[error("{field} must be a finite value > 0, got {value}")]
    NonPositiveMultiplier { field: &'static str, value: f64 },

    #[error("near_resistance_fraction must be in (0, 1], got {0}")]
    FractionOutOfRange(f64),
}

/// Parameters for one `analyze` call. Validated before any bar is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub rsi_period: usize,
    pub volume_ma_period: usize,
    pub trim_window: usize,
    pub price_anomaly_multiplier: f64,
    pub volume_anomaly_multiplier: f64,
    pub near_resistance_fraction: f64,
    pub anomaly_policy: AnomalyPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ema_fast_period: 9,
            ema_slow_period: 21,
            rsi_period: 14,
            volume_ma_period: 10,
            trim_window: 10,
            price_anomaly_multiplier: 3.0,
            volume_anomaly_multiplier: 2.5,
            near_resistance_fraction: 0.998,
            anomaly_policy: AnomalyPolicy::TrimmedBaseline,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, period) in [
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("rsi_period", self.rsi_period),
            ("volume_ma_period", self.volume_ma_period),
        ] {
            if period == 0 {
                return Err(ConfigError::NonPositivePeriod { field });
            }
        }
        if self.ema_slow_period <= self.ema_fast_period {
            return Err(ConfigError::SlowNotAboveFast {
                fast: self.ema_fast_period,
                slow: self.ema_slow_period,
            });
        }
        if self.trim_window < 3 {
            return Err(ConfigError::TrimWindowTooSmall(self.trim_window));
        }

        let mut multipliers = vec![
            ("price_anomaly_multiplier", self.price_anomaly_multiplier),
            ("volume_anomaly_multiplier", self.volume_anomaly_multiplier),
        ];
        if let AnomalyPolicy::FixedThreshold {
            price_change_pct,
            volume_ratio,
        } = self.anomaly_policy
        {
            multipliers.push(("anomaly_policy.price_change_pct", price_change_pct));
            multipliers.push(("anomaly_policy.volume_ratio", volume_ratio));
        }
        for (field, value) in multipliers {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveMultiplier { field, value });
            }
        }

        let f = self.near_resistance_fraction;
        if !(f > 0.0 && f <= 1.0) {
            return Err(ConfigError::FractionOutOfRange(f));
        }
        Ok(())
    }

    /// Minimum number of bars `analyze` accepts for this configuration.
    pub fn min_bars(&self) -> usize {
        self.ema_slow_period
            .max(self.rsi_period)
            .max(self.volume_ma_period)
            .max(self.trim_window)
            .saturating_add(2)
    }
}
