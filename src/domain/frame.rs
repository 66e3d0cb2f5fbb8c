//! Indicator frame: SMA short/long, RSI and MACD aligned per date.
//!
//! Each indicator is computed over the full price series, then rows where any
//! indicator is still warming up are dropped. What remains is a contiguous
//! tail of the price series starting at [`IndicatorFrame::warmup`].

use chrono::NaiveDate;
use log::debug;

use crate::domain::error::TrendsignalError;
use crate::domain::indicator::macd::calculate_macd_default;
use crate::domain::indicator::{calculate_rsi, calculate_sma};
use crate::domain::price::PriceSeries;
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub params: StrategyParams,
    /// Index into the price series of the first row.
    pub warmup: usize,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

pub fn compute_indicators(
    prices: &PriceSeries,
    sma_short: usize,
    sma_long: usize,
    rsi_window: usize,
) -> Result<IndicatorFrame, TrendsignalError> {
    for (name, window) in [
        ("sma_short", sma_short),
        ("sma_long", sma_long),
        ("rsi_period", rsi_window),
    ] {
        if window == 0 {
            return Err(TrendsignalError::InvalidParameter {
                name: name.into(),
                reason: "window must be positive".into(),
            });
        }
    }

    let params = StrategyParams::new(sma_short, sma_long, rsi_window);
    let minimum = params.required_bars();
    if prices.len() < minimum {
        return Err(TrendsignalError::InsufficientData {
            symbol: prices.symbol().to_string(),
            bars: prices.len(),
            minimum,
        });
    }

    let bars = prices.bars();
    let short = calculate_sma(bars, sma_short);
    let long = calculate_sma(bars, sma_long);
    let rsi = calculate_rsi(bars, rsi_window);
    let macd = calculate_macd_default(bars);

    let mut rows = Vec::with_capacity(bars.len() + 1 - minimum);
    for (i, bar) in bars.iter().enumerate() {
        let (Some(s), Some(l), Some(r), Some((m, sig))) = (
            short.simple_at(i),
            long.simple_at(i),
            rsi.simple_at(i),
            macd.macd_at(i),
        ) else {
            continue;
        };

        rows.push(IndicatorRow {
            date: bar.date,
            close: bar.close,
            sma_short: s,
            sma_long: l,
            rsi: r,
            macd: m,
            macd_signal: sig,
        });
    }

    let warmup = bars.len() - rows.len();
    debug!(
        "{}: {} rows of {}, {}, {}, {} from {} bars (warmup {})",
        prices.symbol(),
        rows.len(),
        short.indicator_type,
        long.indicator_type,
        rsi.indicator_type,
        macd.indicator_type,
        bars.len(),
        warmup
    );

    Ok(IndicatorFrame {
        params,
        warmup,
        rows,
    })
}
