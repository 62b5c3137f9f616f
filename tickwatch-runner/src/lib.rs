//! tickwatch runner: watch configuration, refresh cycles, rendering.
//!
//! This crate builds on `tickwatch-core` to provide:
//! - `WatchConfig` loaded from TOML
//! - One refresh cycle with per-symbol parallel analysis
//! - Plain-text summary cards, detail blocks and volatility header
//! - The interruptible poll-compute-render loop

pub mod config;
pub mod cycle;
pub mod render;
pub mod watch;

pub use config::{WatchConfig, WatchConfigError};
pub use cycle::{analyze_symbol, run_cycle, CycleReport, SymbolError, SymbolReport};
pub use render::{render_cycle, render_detail, render_summary, render_volatility};
pub use watch::{sleep_interruptible, watch};
