//! Report and chart output port traits.

use std::path::Path;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::decision::Decision;
use crate::domain::error::TrendsignalError;

/// Port for human-readable run reports.
pub trait ReportPort {
    fn write_decision(&mut self, decision: &Decision) -> Result<(), TrendsignalError>;

    /// `config` carries the requested range; `result` the dates actually evaluated.
    fn write_backtest(
        &mut self,
        config: &BacktestConfig,
        result: &BacktestResult,
    ) -> Result<(), TrendsignalError>;
}

/// Port for rendering the cumulative-return comparison chart.
pub trait ChartPort {
    fn render(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TrendsignalError>;
}
