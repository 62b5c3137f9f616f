//! Outlier-trimmed statistics used as a local anomaly baseline.
//!
//! The baseline covers the `trim_window` bars immediately before the latest
//! bar; the latest bar is never part of its own baseline.

use serde::{Deserialize, Serialize};

use crate::domain::{pct_change, Bar};

/// Price baseline when fewer than three usable changes exist.
pub const FALLBACK_PRICE_CHANGE_PCT: f64 = 0.0;

/// Volume baseline when the sub-window holds no volume at all.
pub const FALLBACK_VOLUME: f64 = 1.0;

/// Mean after dropping the single lowest and single highest value.
///
/// Returns `None` for two or fewer values, where trimming would leave
/// nothing meaningful to average.
pub fn trimmed_mean(values: &[f64]) -> Option<f64> {
    if values.len() <= 2 {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let kept = &sorted[1..sorted.len() - 1];
    Some(kept.iter().sum::<f64>() / kept.len() as f64)
}

/// Trimmed averages of bar-over-bar price change and raw volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimmedBaseline {
    pub avg_price_change_pct: f64,
    pub avg_volume: f64,
}

impl TrimmedBaseline {
    /// Build the baseline from `history`, which must end just before the
    /// bar under test. Only the last `trim_window` bars are averaged; the bar
    /// before them, when present, supplies the first price difference.
    pub fn compute(history: &[Bar], trim_window: usize) -> Self {
        let start = history.len().saturating_sub(trim_window);

        let price_changes: Vec<f64> = (start.max(1)..history.len())
            .filter_map(|i| pct_change(history[i - 1].close, history[i].close))
            .collect();

        let volumes: Vec<f64> = history[start..].iter().map(|b| b.volume as f64).collect();

        let avg_price_change_pct =
            trimmed_mean(&price_changes).unwrap_or(FALLBACK_PRICE_CHANGE_PCT);
        let avg_volume = trimmed_mean(&volumes)
            .or_else(|| volumes.last().copied())
            .unwrap_or(FALLBACK_VOLUME);

        Self {
            avg_price_change_pct,
            avg_volume,
        }
    }
}
