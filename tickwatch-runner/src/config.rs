//! Watch configuration, loaded from TOML.
//!
//! ```toml
//! symbols = ["TSLA", "NVDA", "AAPL"]
//! interval = "1m"
//! refresh_secs = 60
//! volatility_symbol = "^VIX"
//! volatility_interval = "2m"
//! max_bars = 390
//!
//! [analysis]
//! ema_fast_period = 9
//! ema_slow_period = 21
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tickwatch_core::analysis::{AnalysisConfig, ConfigError};
use tickwatch_core::domain::Interval;

#[derive(Debug, Error)]
pub enum WatchConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("watch list is empty")]
    NoSymbols,

    #[error("refresh_secs must be > 0")]
    ZeroRefresh,

    #[error("max_bars ({max_bars}) is below the {required} bars the analysis needs")]
    MaxBarsTooSmall { max_bars: usize, required: usize },

    #[error(transparent)]
    Analysis(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub symbols: Vec<String>,
    pub interval: Interval,
    pub refresh_secs: u64,
    pub volatility_symbol: String,
    /// Bar interval of the volatility gauge, independent of `interval`.
    pub volatility_interval: Interval,
    /// Keep only the most recent `max_bars` bars of each fetched window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bars: Option<usize>,
    pub analysis: AnalysisConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            symbols: ["TSLA", "NVDA", "AAPL", "MSFT", "GOOGL"]
                .into_iter()
                .map(String::from)
                .collect(),
            interval: Interval::OneMinute,
            refresh_secs: 60,
            volatility_symbol: "^VIX".into(),
            volatility_interval: Interval::TwoMinutes,
            max_bars: None,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl WatchConfig {
    pub fn from_file(path: &Path) -> Result<Self, WatchConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, WatchConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.normalize_symbols();
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, WatchConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Upper-case, trim and drop blank entries, keeping first occurrences.
    pub fn normalize_symbols(&mut self) {
        let mut seen = Vec::with_capacity(self.symbols.len());
        for s in self.symbols.drain(..) {
            let s = s.trim().to_uppercase();
            if !s.is_empty() && !seen.contains(&s) {
                seen.push(s);
            }
        }
        self.symbols = seen;
    }

    pub fn validate(&self) -> Result<(), WatchConfigError> {
        if self.symbols.is_empty() {
            return Err(WatchConfigError::NoSymbols);
        }
        if self.refresh_secs == 0 {
            return Err(WatchConfigError::ZeroRefresh);
        }
        self.analysis.validate()?;
        if let Some(max_bars) = self.max_bars {
            let required = self.analysis.min_bars();
            if max_bars < required {
                return Err(WatchConfigError::MaxBarsTooSmall { max_bars, required });
            }
        }
        Ok(())
    }
}
