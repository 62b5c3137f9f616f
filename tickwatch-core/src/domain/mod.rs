//! Domain types for tickwatch

pub mod bar;
pub mod interval;

pub use bar::{pct_change, Bar, BarError, BarWindow};
pub use interval::{Interval, UnknownInterval};

/// Symbol type alias
pub type Symbol = String;
