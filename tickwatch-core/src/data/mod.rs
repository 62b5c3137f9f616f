//! Bar sources: the collaborators that supply bar windows to the engine.

pub mod circuit_breaker;
pub mod csv_source;
pub mod provider;
pub mod synthetic;
pub mod volatility;
pub mod yahoo;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use csv_source::{read_bars, write_bars, CsvSource};
pub use provider::{BarSource, DataError};
pub use synthetic::{generate_bars, SyntheticSource};
pub use volatility::VolatilityReading;
pub use yahoo::YahooSource;
