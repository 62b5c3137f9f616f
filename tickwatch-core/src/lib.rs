//! tickwatch core: bar domain types, indicators, anomaly detection and alerts.
//!
//! This crate contains the signal-computation engine:
//! - Domain types (bars, validated bar windows, sampling intervals)
//! - Series indicators (EMA, RSI, volume SMA) and window pivot levels
//! - Outlier-trimmed baseline statistics
//! - Anomaly detection and strict-priority alert classification
//! - The pure `analyze` orchestrator
//! - Bar sources (Yahoo Finance, CSV, synthetic) behind the `BarSource` trait

pub mod analysis;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod stats;

pub use analysis::{analyze, AnalysisConfig, AnalysisError, AnalysisResult};
