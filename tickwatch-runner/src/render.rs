//! Plain-text rendering of cycle results.

use std::fmt::Write as _;

use tickwatch_core::analysis::{AnalysisResult, Trend, VolumeStatus};
use tickwatch_core::data::VolatilityReading;

use crate::cycle::{CycleReport, SymbolReport};

/// Bar-over-bar move (in percent) that earns a price tag on the card.
pub const PRICE_TAG_PCT: f64 = 1.5;

/// Volume ratio that earns a volume tag on the card.
pub const VOLUME_TAG_RATIO: f64 = 2.5;

fn volume_label(status: VolumeStatus) -> &'static str {
    match status {
        VolumeStatus::Normal => "normal",
        VolumeStatus::Elevated => "elevated",
        VolumeStatus::Surge => "surge",
    }
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Bullish => "bullish",
        Trend::Bearish => "bearish",
    }
}

/// Display-only tags for large moves. Independent of the anomaly flags.
pub fn anomaly_tags(result: &AnalysisResult) -> Vec<String> {
    let mut tags = Vec::new();
    if result.bar_over_bar_change_pct.abs() >= PRICE_TAG_PCT {
        tags.push(format!("price {:+.1}%", result.bar_over_bar_change_pct));
    }
    if result.volume_ratio >= VOLUME_TAG_RATIO {
        tags.push(format!("vol x{:.1}", result.volume_ratio));
    }
    tags
}

pub fn render_volatility(symbol: &str, reading: &VolatilityReading) -> String {
    let note = if reading.is_rising() {
        "volatility rising, trade cautiously"
    } else {
        "volatility steady, favourable for technical setups"
    };
    format!(
        "{symbol} {:.2} ({:+.2}) | {note}",
        reading.level, reading.change
    )
}

pub fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} | {}",
        result.alert.severity, result.symbol, result.alert.message
    );
    let _ = writeln!(
        out,
        "  volume: {} ({:.1}x)",
        volume_label(result.volume_status),
        result.volume_ratio
    );
    let tags = anomaly_tags(result);
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    };
    let _ = writeln!(
        out,
        "  bar: {:+.2}%  day: {:+.2}%{tags}",
        result.bar_over_bar_change_pct, result.intraday_change_pct
    );
    let _ = write!(out, "  RSI {:.1} | price {:.2}", result.rsi, result.latest_price);
    out
}

pub fn render_detail(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} @ {}", result.symbol, result.as_of.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "  price       {:.2} ({:+.2}%)",
        result.latest_price, result.intraday_change_pct
    );
    let _ = writeln!(out, "  resistance  {:.2}", result.resistance);
    let _ = writeln!(out, "  support     {:.2}", result.support);
    let _ = write!(
        out,
        "  trend       {} (EMA fast {:.2} / slow {:.2})",
        trend_label(result.trend),
        result.ema_fast,
        result.ema_slow
    );
    out
}

pub fn render_unavailable(report: &SymbolReport) -> Option<String> {
    match &report.outcome {
        Ok(_) => None,
        Err(e) => Some(format!("{} unavailable: {e}", report.symbol)),
    }
}

/// Full cycle: volatility header, summary cards, then detail blocks for the
/// symbols that produced a result.
pub fn render_cycle(cycle: &CycleReport, volatility_symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} ==",
        cycle.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "{}", render_volatility(volatility_symbol, &cycle.volatility));
    let _ = writeln!(out);

    for report in &cycle.reports {
        match report.result() {
            Some(result) => {
                let _ = writeln!(out, "{}", render_summary(result));
            }
            None => {
                if let Some(line) = render_unavailable(report) {
                    let _ = writeln!(out, "{line}");
                }
            }
        }
    }

    let details: Vec<String> = cycle
        .reports
        .iter()
        .filter_map(SymbolReport::result)
        .map(render_detail)
        .collect();
    if !details.is_empty() {
        let _ = writeln!(out);
        for block in details {
            let _ = writeln!(out, "{block}");
        }
    }
    out
}
