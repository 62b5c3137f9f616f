//! CSV bar source: one `<SYMBOL>.csv` file per symbol in a directory.
//!
//! Expected header: `timestamp,open,high,low,close,volume` with RFC 3339
//! timestamps. Rows must already be in ascending time order.

use std::path::{Path, PathBuf};

use super::provider::{BarSource, DataError};
use crate::domain::{Bar, BarWindow, Interval};

#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

/// Read every bar from a CSV file.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        bars.push(row?);
    }
    Ok(bars)
}

/// Write bars to a CSV file with the header `read_bars` expects.
pub fn write_bars(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer.flush()?;
    Ok(())
}

impl BarSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, interval: Interval) -> Result<BarWindow, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let bars = read_bars(&path)?;
        Ok(BarWindow::new(symbol, interval, bars)?)
    }
}
