//! Indicator windows shared by the decision and backtest pipelines.

use crate::domain::indicator::macd::DEFAULT_REQUIRED_BARS;

pub const DEFAULT_SMA_SHORT: usize = 50;
pub const DEFAULT_SMA_LONG: usize = 200;
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
}

impl StrategyParams {
    pub fn new(sma_short: usize, sma_long: usize, rsi_period: usize) -> Self {
        Self {
            sma_short,
            sma_long,
            rsi_period,
        }
    }

    /// Number of bars needed before every indicator has a value.
    ///
    /// RSI needs `rsi_period` price changes, i.e. one extra bar.
    pub fn required_bars(&self) -> usize {
        self.sma_short
            .max(self.sma_long)
            .max(self.rsi_period + 1)
            .max(DEFAULT_REQUIRED_BARS)
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self::new(DEFAULT_SMA_SHORT, DEFAULT_SMA_LONG, DEFAULT_RSI_PERIOD)
    }
}
