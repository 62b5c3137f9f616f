//! Signal computation: one bar window in, one immutable analysis result out.
//!
//! `analyze` is pure and stateless. It validates the configuration before
//! touching any bar, rejects windows shorter than `AnalysisConfig::min_bars`,
//! then computes in dependency order: pivot levels and EMA/RSI/volume MA from
//! the whole window, trimmed baseline from the bars before the latest,
//! anomaly flags from both, and finally the alert.

pub mod alert;
pub mod anomaly;
pub mod config;
pub mod trend;

pub use alert::{classify, Alert, AlertInputs, AlertKind, Severity};
pub use anomaly::{detect, volume_ratio, AnomalyFlags, AnomalyInput, VolumeStatus};
pub use config::{AnalysisConfig, AnomalyPolicy, ConfigError};
pub use trend::{Crossover, EmaPair, Trend};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{pct_change, BarWindow};
use crate::indicators::{Indicator, PivotLevels, Rsi, VolumeSma};
use crate::stats::TrimmedBaseline;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Derived signals for the latest bar of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub as_of: DateTime<Utc>,
    pub latest_price: f64,
    pub intraday_change_pct: f64,
    pub bar_over_bar_change_pct: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub trend: Trend,
    pub crossover: Option<Crossover>,
    pub volume_ratio: f64,
    pub volume_status: VolumeStatus,
    pub pivot: f64,
    pub resistance: f64,
    pub support: f64,
    pub trimmed_avg_price_change_pct: f64,
    pub trimmed_avg_volume: f64,
    pub is_price_anomaly: bool,
    pub is_volume_anomaly: bool,
    pub alert: Alert,
}

/// Analyze `window` under `config`.
///
/// `volatility_change` is the latest change of a market-wide volatility
/// gauge; it only decides the severity of a golden cross. `None` counts as
/// no change.
pub fn analyze(
    window: &BarWindow,
    config: &AnalysisConfig,
    volatility_change: Option<f64>,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;

    let required = config.min_bars();
    let actual = window.len();
    let insufficient = AnalysisError::InsufficientData { required, actual };
    if actual < required {
        return Err(insufficient);
    }

    let bars = window.bars();
    let latest = bars[actual - 1];
    let prev = bars[actual - 2];

    let levels = PivotLevels::from_bars(bars).ok_or_else(|| insufficient.clone())?;

    let closes = window.closes();
    let emas = EmaPair::compute(&closes, config.ema_fast_period, config.ema_slow_period)
        .ok_or_else(|| insufficient.clone())?;

    let rsi = Rsi::new(config.rsi_period)
        .compute(bars)
        .last()
        .copied()
        .filter(|v| v.is_finite())
        .ok_or_else(|| insufficient.clone())?;

    let volume_ma = VolumeSma::new(config.volume_ma_period)
        .compute(bars)
        .last()
        .copied()
        .unwrap_or(f64::NAN);
    let ratio = volume_ratio(latest.volume as f64, volume_ma);

    let bar_over_bar_change_pct = pct_change(prev.close, latest.close).unwrap_or(0.0);
    let baseline = TrimmedBaseline::compute(&bars[..actual - 1], config.trim_window);

    let anomalies = detect(
        &AnomalyInput {
            latest_change_pct: bar_over_bar_change_pct,
            volume_ratio: ratio,
            baseline,
        },
        config.anomaly_policy,
        config.price_anomaly_multiplier,
        config.volume_anomaly_multiplier,
    );

    let crossover = emas.crossover();
    let near_resistance =
        levels.is_near_resistance(latest.close, config.near_resistance_fraction);

    let alert = classify(&AlertInputs {
        anomalies,
        bar_over_bar_change_pct,
        crossover,
        near_resistance,
        volatility_change: volatility_change.filter(|v| v.is_finite()).unwrap_or(0.0),
    });

    debug!(
        symbol = window.symbol(),
        bars = actual,
        alert = %alert.message,
        severity = %alert.severity,
        "analysis complete"
    );

    Ok(AnalysisResult {
        symbol: window.symbol().to_string(),
        as_of: latest.timestamp,
        latest_price: latest.close,
        intraday_change_pct: latest.intraday_change_pct(),
        bar_over_bar_change_pct,
        rsi,
        ema_fast: emas.fast,
        ema_slow: emas.slow,
        trend: emas.trend(),
        crossover,
        volume_ratio: ratio,
        volume_status: VolumeStatus::classify(ratio),
        pivot: levels.pivot,
        resistance: levels.resistance,
        support: levels.support,
        trimmed_avg_price_change_pct: baseline.avg_price_change_pct,
        trimmed_avg_volume: baseline.avg_volume,
        is_price_anomaly: anomalies.price,
        is_volume_anomaly: anomalies.volume,
        alert,
    })
}
