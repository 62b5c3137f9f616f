//! One refresh cycle: read the volatility gauge, then analyze every watched
//! symbol in parallel.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use tickwatch_core::analysis::{analyze, AnalysisConfig, AnalysisError, AnalysisResult};
use tickwatch_core::data::{BarSource, DataError, VolatilityReading};
use tickwatch_core::domain::Interval;

use crate::config::WatchConfig;

/// Why a symbol produced no result this cycle.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("{0}")]
    Fetch(#[from] DataError),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: Result<AnalysisResult, SymbolError>,
}

impl SymbolReport {
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.outcome.as_ref().ok()
    }
}

#[derive(Debug)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub volatility: VolatilityReading,
    /// One report per watched symbol, in watch-list order.
    pub reports: Vec<SymbolReport>,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }
}

/// Fetch and analyze a single symbol.
pub fn analyze_symbol(
    source: &dyn BarSource,
    symbol: &str,
    interval: Interval,
    config: &AnalysisConfig,
    max_bars: Option<usize>,
    volatility_change: Option<f64>,
) -> Result<AnalysisResult, SymbolError> {
    let mut window = source.fetch(symbol, interval)?;
    if let Some(n) = max_bars {
        window = window.tail(n);
    }
    Ok(analyze(&window, config, volatility_change)?)
}

/// Run one cycle against `source`. A failing symbol never aborts the others.
pub fn run_cycle(source: &dyn BarSource, config: &WatchConfig) -> CycleReport {
    let started_at = Utc::now();
    let volatility = VolatilityReading::fetch(
        source,
        &config.volatility_symbol,
        config.volatility_interval,
    );
    debug!(level = volatility.level, change = volatility.change, "volatility gauge");

    let reports: Vec<SymbolReport> = config
        .symbols
        .par_iter()
        .map(|symbol| {
            let outcome = analyze_symbol(
                source,
                symbol,
                config.interval,
                &config.analysis,
                config.max_bars,
                Some(volatility.change),
            );
            if let Err(e) = &outcome {
                warn!(symbol = %symbol, source = source.name(), error = %e, "symbol skipped");
            }
            SymbolReport {
                symbol: symbol.clone(),
                outcome,
            }
        })
        .collect();

    CycleReport {
        started_at,
        volatility,
        reports,
    }
}
