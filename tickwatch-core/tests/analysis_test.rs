//! End-to-end tests of `analyze` on hand-built bar windows.
//!
//! Each test shapes a window so one rule of the engine is the only thing
//! that can decide the outcome: minimum length, configuration validation,
//! trend boundary, crossover transitions, pivot levels, trimmed baseline and
//! alert precedence.

use chrono::{TimeZone, Utc};
use tickwatch_core::analysis::{
    AlertKind, AnalysisConfig, AnalysisError, AnomalyPolicy, ConfigError, Crossover, Severity,
    Trend,
};
use tickwatch_core::analyze;
use tickwatch_core::domain::{Bar, BarWindow, Interval};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Bar {
    Bar {
        timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap()
            + chrono::Duration::minutes(i as i64),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Bars with open = high = low = close and a constant volume.
fn flat_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| bar(i, c, c, c, c, 1_000))
        .collect()
}

fn window(bars: Vec<Bar>) -> BarWindow {
    BarWindow::new("TEST", Interval::OneMinute, bars).unwrap()
}

fn small_config() -> AnalysisConfig {
    AnalysisConfig {
        ema_fast_period: 2,
        ema_slow_period: 5,
        rsi_period: 3,
        volume_ma_period: 3,
        trim_window: 3,
        ..Default::default()
    }
}

/// Anomaly thresholds so high that only crossovers and proximity can fire.
fn quiet_anomalies(config: AnalysisConfig) -> AnalysisConfig {
    AnalysisConfig {
        anomaly_policy: AnomalyPolicy::FixedThreshold {
            price_change_pct: 50.0,
            volume_ratio: 10.0,
        },
        ..config
    }
}

// ──────────────────────────────────────────────
// Length and configuration
// ──────────────────────────────────────────────

#[test]
fn insufficient_data_below_minimum() {
    let config = small_config();
    let required = config.min_bars();
    assert_eq!(required, 7);

    for len in 0..required {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
        let err = analyze(&window(flat_bars(&closes)), &config, None).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                required,
                actual: len
            }
        );
    }

    let closes: Vec<f64> = (0..required).map(|i| 100.0 + i as f64).collect();
    assert!(analyze(&window(flat_bars(&closes)), &config, None).is_ok());
}

#[test]
fn invalid_configuration_wins_over_short_window() {
    let config = AnalysisConfig {
        ema_fast_period: 21,
        ema_slow_period: 9,
        ..Default::default()
    };
    let err = analyze(&window(vec![]), &config, None).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InvalidConfiguration(ConfigError::SlowNotAboveFast { fast: 21, slow: 9 })
    );
}

// ──────────────────────────────────────────────
// Indicators through the engine
// ──────────────────────────────────────────────

#[test]
fn non_decreasing_closes_give_rsi_100() {
    let closes = [100.0, 100.0, 101.0, 101.0, 102.5, 103.0, 103.0, 104.0];
    let result = analyze(&window(flat_bars(&closes)), &small_config(), None).unwrap();
    assert_eq!(result.rsi, 100.0);
}

#[test]
fn equal_emas_classify_bearish() {
    let result = analyze(&window(flat_bars(&[50.0; 10])), &small_config(), None).unwrap();
    assert_eq!(result.ema_fast, result.ema_slow);
    assert_eq!(result.trend, Trend::Bearish);
    assert_eq!(result.crossover, None);
}

#[test]
fn symmetric_pivot_levels() {
    let mut bars = flat_bars(&[100.0; 8]);
    bars[2] = bar(2, 100.0, 110.0, 100.0, 100.0, 1_000);
    bars[4] = bar(4, 100.0, 100.0, 90.0, 100.0, 1_000);
    let result = analyze(&window(bars), &small_config(), None).unwrap();
    assert_eq!(result.pivot, 100.0);
    assert_eq!(result.resistance, 110.0);
    assert_eq!(result.support, 90.0);
}

#[test]
fn trimmed_volume_ignores_single_extreme() {
    let config = AnalysisConfig {
        trim_window: 6,
        ..small_config()
    };
    // min_bars = 8; the six bars before the latest carry the test volumes.
    let volumes = [5_000, 10, 20, 30, 40, 50, 1000, 60];
    let bars = volumes
        .iter()
        .enumerate()
        .map(|(i, &v)| bar(i, 100.0, 100.0, 100.0, 100.0, v))
        .collect();
    let result = analyze(&window(bars), &config, None).unwrap();
    assert_eq!(result.trimmed_avg_volume, 35.0);
    assert_eq!(result.trimmed_avg_price_change_pct, 0.0);
}

#[test]
fn zero_volume_history_does_not_fail() {
    let bars = (0..8).map(|i| bar(i, 10.0, 10.0, 10.0, 10.0, 0)).collect();
    let result = analyze(&window(bars), &small_config(), None).unwrap();
    assert_eq!(result.volume_ratio, 1.0);
    assert!(!result.is_volume_anomaly);
    assert_eq!(result.trimmed_avg_volume, 0.0);
}

// ──────────────────────────────────────────────
// Crossovers
// ──────────────────────────────────────────────

#[test]
fn golden_cross_fires_on_the_crossing_bar_only() {
    let config = quiet_anomalies(small_config());
    let mut closes = vec![100.0; 8];
    closes.push(101.0);

    let before = analyze(&window(flat_bars(&closes[..8])), &config, None).unwrap();
    assert_eq!(before.crossover, None);

    let at = analyze(&window(flat_bars(&closes)), &config, None).unwrap();
    assert_eq!(at.crossover, Some(Crossover::Golden));
    assert_eq!(at.trend, Trend::Bullish);
    assert_eq!(at.alert.kind, AlertKind::GoldenCross);
    assert_eq!(at.alert.message, "golden cross");

    closes.push(101.5);
    let after = analyze(&window(flat_bars(&closes)), &config, None).unwrap();
    assert_eq!(after.crossover, None);
    assert_eq!(after.trend, Trend::Bullish);
}

#[test]
fn steady_uptrend_never_crosses() {
    let config = quiet_anomalies(small_config());
    let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64 * 0.5).collect();
    for end in config.min_bars()..=closes.len() {
        let result = analyze(&window(flat_bars(&closes[..end])), &config, None).unwrap();
        assert_eq!(result.crossover, None, "unexpected cross at bar {end}");
        assert_eq!(result.trend, Trend::Bullish);
    }
}

#[test]
fn golden_cross_severity_depends_on_volatility() {
    let config = quiet_anomalies(small_config());
    let mut closes = vec![100.0; 8];
    closes.push(101.0);
    let w = window(flat_bars(&closes));

    assert_eq!(analyze(&w, &config, None).unwrap().alert.severity, Severity::Critical);
    assert_eq!(analyze(&w, &config, Some(-0.4)).unwrap().alert.severity, Severity::Critical);
    assert_eq!(analyze(&w, &config, Some(0.4)).unwrap().alert.severity, Severity::Warning);
}

#[test]
fn death_cross_is_critical() {
    let config = quiet_anomalies(small_config());
    let mut closes = vec![100.0; 8];
    closes.push(99.0);
    let result = analyze(&window(flat_bars(&closes)), &config, Some(1.0)).unwrap();
    assert_eq!(result.crossover, Some(Crossover::Death));
    assert_eq!(result.trend, Trend::Bearish);
    assert_eq!(result.alert.kind, AlertKind::DeathCross);
    assert_eq!(result.alert.severity, Severity::Critical);
}

// ──────────────────────────────────────────────
// Alert precedence
// ──────────────────────────────────────────────

#[test]
fn anomaly_outranks_golden_cross() {
    // Flat history gives a zero trimmed baseline, so the +1% jump that makes
    // the golden cross is also a price anomaly.
    let mut closes = vec![100.0; 8];
    closes.push(101.0);
    let result = analyze(&window(flat_bars(&closes)), &small_config(), None).unwrap();

    assert_eq!(result.crossover, Some(Crossover::Golden));
    assert!(result.is_price_anomaly);
    assert_eq!(result.alert.kind, AlertKind::Anomaly);
    assert_eq!(result.alert.message, "anomaly: price");
    assert_eq!(result.alert.severity, Severity::Warning);
}

#[test]
fn falling_price_anomaly_is_critical() {
    let mut closes = vec![100.0; 8];
    closes.push(98.0);
    let result = analyze(&window(flat_bars(&closes)), &small_config(), None).unwrap();
    assert!(result.is_price_anomaly);
    assert_eq!(result.alert.severity, Severity::Critical);
}

/// Wide range early, then price drifts back up to the top of the window.
fn recovery_bars() -> Vec<Bar> {
    let mut bars = flat_bars(&[100.0; 9]);
    bars[1] = bar(1, 100.0, 100.0, 96.0, 100.0, 1_000);
    for (i, close) in [(6, 100.5), (7, 101.0), (8, 101.5)] {
        bars[i] = bar(i, close, close, close, close, 1_000);
    }
    bars
}

#[test]
fn near_resistance_when_nothing_else_fires() {
    let config = quiet_anomalies(small_config());
    let result = analyze(&window(recovery_bars()), &config, None).unwrap();
    // pivot = (101.5 + 96 + 101.5) / 3 = 99.667; resistance = 103.33
    assert!(result.latest_price < result.resistance * config.near_resistance_fraction);
    assert_eq!(result.crossover, None);
    assert_eq!(result.alert.kind, AlertKind::Stable);

    let loose = AnalysisConfig {
        near_resistance_fraction: 0.98,
        ..config
    };
    let result = analyze(&window(recovery_bars()), &loose, None).unwrap();
    assert_eq!(result.alert.kind, AlertKind::NearResistance);
    assert_eq!(result.alert.message, "near resistance");
    assert_eq!(result.alert.severity, Severity::Warning);
}

#[test]
fn fixed_threshold_policy_flags_absolute_moves() {
    let config = AnalysisConfig {
        anomaly_policy: AnomalyPolicy::fixed_threshold_default(),
        ..small_config()
    };
    let mut closes = vec![100.0; 8];
    closes.push(100.4);
    let small_move = analyze(&window(flat_bars(&closes)), &config, None).unwrap();
    assert!(!small_move.is_price_anomaly);

    closes.pop();
    closes.push(99.0);
    let big_move = analyze(&window(flat_bars(&closes)), &config, None).unwrap();
    assert!(big_move.is_price_anomaly);
    assert_eq!(big_move.alert.kind, AlertKind::Anomaly);
    assert_eq!(big_move.alert.severity, Severity::Critical);
}
