//! Performance metrics over a backtest return series.

use chrono::NaiveDate;

use crate::domain::backtest::ReturnRow;
use crate::domain::error::TrendsignalError;
use crate::domain::signal::Signal;

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub calendar_days: i64,
    pub strategy_return: f64,
    pub buy_and_hold_return: f64,
    pub strategy_cagr: f64,
    pub buy_and_hold_cagr: f64,
    pub trade_count: usize,
    pub strategy_max_drawdown: f64,
    pub buy_and_hold_max_drawdown: f64,
}

impl PerformanceSummary {
    /// Aggregates a return series whose cumulative columns are already filled.
    ///
    /// Fails with `DegenerateRange` when the series spans less than one
    /// calendar day, since CAGR is undefined there.
    pub fn compute(rows: &[ReturnRow]) -> Result<Self, TrendsignalError> {
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(TrendsignalError::InvalidParameter {
                    name: "returns".into(),
                    reason: "empty return series".into(),
                });
            }
        };

        let calendar_days = (last.date - first.date).num_days();
        if calendar_days < 1 {
            return Err(TrendsignalError::DegenerateRange {
                start: first.date,
                end: last.date,
            });
        }

        let strategy_curve: Vec<f64> = rows.iter().map(|r| r.cumulative_strategy).collect();
        let market_curve: Vec<f64> = rows.iter().map(|r| r.cumulative_market).collect();
        let signals: Vec<Signal> = rows.iter().map(|r| r.signal).collect();

        Ok(PerformanceSummary {
            start_date: first.date,
            end_date: last.date,
            calendar_days,
            strategy_return: last.cumulative_strategy,
            buy_and_hold_return: last.cumulative_market,
            strategy_cagr: cagr(last.cumulative_strategy, calendar_days),
            buy_and_hold_cagr: cagr(last.cumulative_market, calendar_days),
            trade_count: count_trades(&signals),
            strategy_max_drawdown: max_drawdown(&strategy_curve),
            buy_and_hold_max_drawdown: max_drawdown(&market_curve),
        })
    }
}

/// Running product of (1 + r), minus one.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth - 1.0
        })
        .collect()
}

/// (1 + total)^(365.25 / days) - 1
///
/// NaN when `calendar_days` is not positive; a non-finite total propagates.
pub fn cagr(total_return: f64, calendar_days: i64) -> f64 {
    if calendar_days <= 0 {
        return f64::NAN;
    }
    (1.0 + total_return).powf(DAYS_PER_YEAR / calendar_days as f64) - 1.0
}

/// Number of signal changes; the first signal is compared against `Flat`.
pub fn count_trades(signals: &[Signal]) -> usize {
    let mut previous = Signal::Flat;
    let mut trades = 0;
    for &signal in signals {
        if signal != previous {
            trades += 1;
        }
        previous = signal;
    }
    trades
}

/// Largest peak-to-trough decline of the wealth curve `1 + cumulative`.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for c in cumulative {
        let wealth = 1.0 + c;
        if wealth > peak {
            peak = wealth;
        } else if peak > 0.0 {
            let dd = (peak - wealth) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
