//! Per-day backtest returns exported as CSV.

use std::io;
use std::path::Path;

use log::info;

use crate::domain::backtest::ReturnSeries;
use crate::domain::error::TrendsignalError;

/// Writes one row per simulated day, headers taken from `ReturnRow` field names.
pub fn write_returns(series: &ReturnSeries, path: &Path) -> Result<(), TrendsignalError> {
    let mut writer = csv::Writer::from_path(path).map_err(io::Error::other)?;
    for row in &series.rows {
        writer.serialize(row).map_err(io::Error::other)?;
    }
    writer.flush()?;
    info!(
        "{}: wrote {} return rows to {}",
        series.symbol,
        series.rows.len(),
        path.display()
    );
    Ok(())
}
