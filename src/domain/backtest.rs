//! Backtest engine: signal → lagged position → returns → summary.
//!
//! BacktestConfig defines the symbol, date range and indicator windows.

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::domain::error::TrendsignalError;
use crate::domain::frame::{compute_indicators, IndicatorFrame, IndicatorRow};
use crate::domain::metrics::{cumulative_returns, PerformanceSummary};
use crate::domain::price::PriceSeries;
use crate::domain::signal::Signal;
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: StrategyParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    /// Yesterday's signal exposure: 1 invested, 0 in cash.
    pub position: u8,
    pub market_return: f64,
    pub strategy_return: f64,
    pub cumulative_market: f64,
    pub cumulative_strategy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub symbol: String,
    pub rows: Vec<ReturnRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub returns: ReturnSeries,
    pub summary: PerformanceSummary,
}

pub fn run_backtest(
    prices: &PriceSeries,
    params: &StrategyParams,
) -> Result<BacktestResult, TrendsignalError> {
    let frame = compute_indicators(prices, params.sma_short, params.sma_long, params.rsi_period)?;
    let rows = simulate(prior_close(prices, &frame), &frame.rows);
    let summary = PerformanceSummary::compute(&rows)?;

    info!(
        "{}: backtest {} to {} over {} rows, {} trades",
        prices.symbol(),
        summary.start_date,
        summary.end_date,
        rows.len(),
        summary.trade_count
    );

    Ok(BacktestResult {
        returns: ReturnSeries {
            symbol: prices.symbol().to_string(),
            rows,
        },
        summary,
    })
}

/// Close of the bar just before the first frame row, if the series has one.
fn prior_close(prices: &PriceSeries, frame: &IndicatorFrame) -> Option<f64> {
    frame
        .warmup
        .checked_sub(1)
        .map(|i| prices.bars()[i].close)
}

/// Derives positions and returns for consecutive indicator rows.
///
/// `prior_close` is the close before `rows[0]`; without it the first row has
/// no return and is dropped. The bar before the first row is inside warmup,
/// so its signal is `Flat` and the first position is always 0.
pub fn simulate(prior_close: Option<f64>, rows: &[IndicatorRow]) -> Vec<ReturnRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut previous_close = prior_close;
    let mut previous_signal = Signal::Flat;

    for row in rows {
        let signal = Signal::from_row(row);
        if let Some(prev) = previous_close {
            let position = previous_signal.exposure();
            let market_return = (row.close - prev) / prev;
            out.push(ReturnRow {
                date: row.date,
                close: row.close,
                signal,
                position,
                market_return,
                strategy_return: market_return * f64::from(position),
                cumulative_market: 0.0,
                cumulative_strategy: 0.0,
            });
        }
        previous_close = Some(row.close);
        previous_signal = signal;
    }

    let market: Vec<f64> = out.iter().map(|r| r.market_return).collect();
    let strategy: Vec<f64> = out.iter().map(|r| r.strategy_return).collect();
    for ((row, m), s) in out
        .iter_mut()
        .zip(cumulative_returns(&market))
        .zip(cumulative_returns(&strategy))
    {
        row.cumulative_market = m;
        row.cumulative_strategy = s;
    }

    out
}
