//! Live decision from the most recent indicator row.

use chrono::NaiveDate;
use log::info;

use crate::domain::error::TrendsignalError;
use crate::domain::frame::{compute_indicators, IndicatorRow};
use crate::domain::price::PriceSeries;
use crate::domain::signal::Action;
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub symbol: String,
    pub date: NaiveDate,
    pub last_price: f64,
    pub capital: f64,
    pub params: StrategyParams,
    pub indicators: IndicatorRow,
    pub action: Action,
    pub quantity: u64,
}

/// Whole shares `capital` buys at `price`.
pub fn share_quantity(capital: f64, price: f64) -> u64 {
    if price <= 0.0 || capital <= 0.0 {
        return 0;
    }
    (capital / price).floor() as u64
}

pub fn decide(
    prices: &PriceSeries,
    capital: f64,
    params: &StrategyParams,
) -> Result<Decision, TrendsignalError> {
    if !capital.is_finite() || capital <= 0.0 {
        return Err(TrendsignalError::InvalidParameter {
            name: "capital".into(),
            reason: format!("must be positive, got {capital}"),
        });
    }

    let frame = compute_indicators(prices, params.sma_short, params.sma_long, params.rsi_period)?;
    let latest = *frame
        .latest()
        .ok_or_else(|| TrendsignalError::InsufficientData {
            symbol: prices.symbol().to_string(),
            bars: prices.len(),
            minimum: params.required_bars(),
        })?;

    let last_price = prices.last().close;
    let action = Action::from_row(&latest);
    let quantity = match action {
        Action::Buy | Action::Sell => share_quantity(capital, last_price),
        Action::Hold => 0,
    };

    info!(
        "{} on {}: {} {} shares at {:.2}",
        prices.symbol(),
        latest.date,
        action,
        quantity,
        last_price
    );

    Ok(Decision {
        symbol: prices.symbol().to_string(),
        date: latest.date,
        last_price,
        capital,
        params: *params,
        indicators: latest,
        action,
        quantity,
    })
}
