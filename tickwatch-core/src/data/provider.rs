//! Bar source trait and structured error types.
//!
//! The `BarSource` trait abstracts over where bar windows come from (Yahoo
//! Finance intraday charts, CSV files, a synthetic generator) so the refresh
//! cycle can swap implementations and tests can mock them.

use thiserror::Error;

use crate::domain::{BarError, BarWindow, Interval};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bars: {0}")]
    InvalidBars(#[from] BarError),

    #[error("data error: {0}")]
    Other(String),
}

/// Where bar windows come from.
///
/// Implementations own retries, rate limiting and parsing; callers only see a
/// validated `BarWindow` or a `DataError`.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the most recent bars for `symbol` at `interval`.
    fn fetch(&self, symbol: &str, interval: Interval) -> Result<BarWindow, DataError>;

    /// Check if the source is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}
