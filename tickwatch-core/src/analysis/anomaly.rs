//! Price and volume anomaly flags plus the three-tier volume status.

use serde::{Deserialize, Serialize};

use super::config::AnomalyPolicy;
use crate::stats::TrimmedBaseline;

/// Ratio at or above which volume is a surge.
pub const SURGE_RATIO: f64 = 2.0;
/// Ratio at or above which volume is elevated.
pub const ELEVATED_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeStatus {
    Normal,
    Elevated,
    Surge,
}

impl VolumeStatus {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= SURGE_RATIO {
            VolumeStatus::Surge
        } else if ratio >= ELEVATED_RATIO {
            VolumeStatus::Elevated
        } else {
            VolumeStatus::Normal
        }
    }
}

/// Latest volume over its moving average; 1.0 when the average is zero or
/// not computable.
pub fn volume_ratio(latest_volume: f64, volume_ma: f64) -> f64 {
    if volume_ma.is_finite() && volume_ma > 0.0 {
        latest_volume / volume_ma
    } else {
        1.0
    }
}

/// Inputs to anomaly detection for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyInput {
    pub latest_change_pct: f64,
    pub volume_ratio: f64,
    pub baseline: TrimmedBaseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyFlags {
    pub price: bool,
    pub volume: bool,
}

impl AnomalyFlags {
    pub fn any(&self) -> bool {
        self.price || self.volume
    }
}

pub fn detect(
    input: &AnomalyInput,
    policy: AnomalyPolicy,
    price_multiplier: f64,
    volume_multiplier: f64,
) -> AnomalyFlags {
    let move_size = input.latest_change_pct.abs();
    match policy {
        AnomalyPolicy::TrimmedBaseline => AnomalyFlags {
            price: move_size > input.baseline.avg_price_change_pct.abs() * price_multiplier,
            volume: input.volume_ratio > volume_multiplier,
        },
        AnomalyPolicy::FixedThreshold {
            price_change_pct,
            volume_ratio,
        } => AnomalyFlags {
            price: move_size >= price_change_pct,
            volume: input.volume_ratio >= volume_ratio,
        },
    }
}
