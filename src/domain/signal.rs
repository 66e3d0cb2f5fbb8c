//! Threshold rule over one indicator row.
//!
//! Entry: short SMA above long SMA, RSI below the overbought level, MACD above
//! its signal line. Exit is the mirror image. Exit only ever flattens a long
//! position; nothing here opens a short.

use std::fmt;

use serde::Serialize;

use crate::domain::frame::IndicatorRow;

pub const RSI_OVERBOUGHT: f64 = 70.0;

pub fn long_condition(row: &IndicatorRow) -> bool {
    row.sma_short > row.sma_long && row.rsi < RSI_OVERBOUGHT && row.macd > row.macd_signal
}

pub fn exit_condition(row: &IndicatorRow) -> bool {
    row.sma_short < row.sma_long && row.rsi > RSI_OVERBOUGHT && row.macd < row.macd_signal
}

/// Per-date backtest state: invested or in cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Signal {
    Long,
    #[default]
    Flat,
}

impl Signal {
    /// Pure function of the row: `Long` iff the entry condition holds.
    ///
    /// The exit condition and the no-condition case both yield `Flat`.
    pub fn from_row(row: &IndicatorRow) -> Self {
        if long_condition(row) {
            Signal::Long
        } else {
            Signal::Flat
        }
    }

    /// 1 when invested, 0 when in cash.
    pub fn exposure(self) -> u8 {
        match self {
            Signal::Long => 1,
            Signal::Flat => 0,
        }
    }
}

/// Single-point live decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Buy,
    /// Liquidate the long position a full-capital `Buy` would hold.
    Sell,
    Hold,
}

impl Action {
    pub fn from_row(row: &IndicatorRow) -> Self {
        if long_condition(row) {
            Action::Buy
        } else if exit_condition(row) {
            Action::Sell
        } else {
            Action::Hold
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "Buy"),
            Action::Sell => write!(f, "Sell"),
            Action::Hold => write!(f, "Hold"),
        }
    }
}
