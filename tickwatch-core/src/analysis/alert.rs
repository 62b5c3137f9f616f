//! Strict-priority alert classification.
//!
//! Decision list, first match wins:
//! 1. anomaly (price and/or volume)
//! 2. golden cross
//! 3. death cross
//! 4. near resistance
//! 5. stable

use serde::{Deserialize, Serialize};
use std::fmt;

use super::anomaly::AnomalyFlags;
use super::trend::Crossover;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Anomaly,
    GoldenCross,
    DeathCross,
    NearResistance,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
}

/// Everything the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertInputs {
    pub anomalies: AnomalyFlags,
    pub bar_over_bar_change_pct: f64,
    pub crossover: Option<Crossover>,
    pub near_resistance: bool,
    /// Latest change of the market-wide volatility proxy.
    pub volatility_change: f64,
}

pub fn classify(inputs: &AlertInputs) -> Alert {
    let flags = inputs.anomalies;
    if flags.any() {
        let severity = if flags.price && inputs.bar_over_bar_change_pct < 0.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let triggers = match (flags.price, flags.volume) {
            (true, true) => "price, volume",
            (true, false) => "price",
            _ => "volume",
        };
        return Alert {
            kind: AlertKind::Anomaly,
            message: format!("anomaly: {triggers}"),
            severity,
        };
    }

    match inputs.crossover {
        Some(Crossover::Golden) => {
            // A rising volatility gauge tempers a bullish cross to a warning.
            let severity = if inputs.volatility_change > 0.0 {
                Severity::Warning
            } else {
                Severity::Critical
            };
            return Alert {
                kind: AlertKind::GoldenCross,
                message: "golden cross".into(),
                severity,
            };
        }
        Some(Crossover::Death) => {
            return Alert {
                kind: AlertKind::DeathCross,
                message: "death cross".into(),
                severity: Severity::Critical,
            };
        }
        None => {}
    }

    if inputs.near_resistance {
        return Alert {
            kind: AlertKind::NearResistance,
            message: "near resistance".into(),
            severity: Severity::Warning,
        };
    }

    Alert {
        kind: AlertKind::Stable,
        message: "stable".into(),
        severity: Severity::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> AlertInputs {
        AlertInputs {
            anomalies: AnomalyFlags::default(),
            bar_over_bar_change_pct: 0.1,
            crossover: None,
            near_resistance: false,
            volatility_change: 0.0,
        }
    }

    #[test]
    fn stable_when_nothing_fires() {
        let alert = classify(&quiet());
        assert_eq!(alert.kind, AlertKind::Stable);
        assert_eq!(alert.message, "stable");
        assert_eq!(alert.severity, Severity::Info);
    }

    #[test]
    fn falling_price_anomaly_is_critical() {
        let inputs = AlertInputs {
            anomalies: AnomalyFlags { price: true, volume: false },
            bar_over_bar_change_pct: -2.0,
            ..quiet()
        };
        let alert = classify(&inputs);
        assert_eq!(alert.message, "anomaly: price");
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn rising_price_anomaly_is_warning() {
        let inputs = AlertInputs {
            anomalies: AnomalyFlags { price: true, volume: true },
            bar_over_bar_change_pct: 2.0,
            ..quiet()
        };
        let alert = classify(&inputs);
        assert_eq!(alert.message, "anomaly: price, volume");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn volume_only_anomaly_on_falling_bar_is_warning() {
        let inputs = AlertInputs {
            anomalies: AnomalyFlags { price: false, volume: true },
            bar_over_bar_change_pct: -2.0,
            ..quiet()
        };
        let alert = classify(&inputs);
        assert_eq!(alert.message, "anomaly: volume");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn anomaly_outranks_golden_cross() {
        let inputs = AlertInputs {
            anomalies: AnomalyFlags { price: false, volume: true },
            crossover: Some(Crossover::Golden),
            near_resistance: true,
            ..quiet()
        };
        assert_eq!(classify(&inputs).kind, AlertKind::Anomaly);
    }

    #[test]
    fn golden_cross_severity_follows_volatility() {
        let rising = AlertInputs {
            crossover: Some(Crossover::Golden),
            volatility_change: 0.3,
            ..quiet()
        };
        assert_eq!(classify(&rising).severity, Severity::Warning);

        let flat = AlertInputs {
            volatility_change: 0.0,
            ..rising
        };
        assert_eq!(classify(&flat).severity, Severity::Critical);
    }

    #[test]
    fn death_cross_outranks_resistance() {
        let inputs = AlertInputs {
            crossover: Some(Crossover::Death),
            near_resistance: true,
            ..quiet()
        };
        let alert = classify(&inputs);
        assert_eq!(alert.kind, AlertKind::DeathCross);
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn near_resistance_is_warning() {
        let inputs = AlertInputs {
            near_resistance: true,
            ..quiet()
        };
        let alert = classify(&inputs);
        assert_eq!(alert.message, "near resistance");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
