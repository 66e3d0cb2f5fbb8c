//! Configuration validation.
//!
//! Validates all config fields before a run so that a bad value aborts
//! before any price data is read.

use crate::domain::error::TrendsignalError;
use crate::domain::strategy::{DEFAULT_RSI_PERIOD, DEFAULT_SMA_LONG, DEFAULT_SMA_SHORT};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_START_DATE: &str = "2020-01-01";
pub const DEFAULT_END_DATE: &str = "2025-04-07";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1095;
/// One hundred years of calendar days.
pub const MAX_LOOKBACK_DAYS: i64 = 36_525;
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh"];

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    validate_symbol(config)?;
    validate_initial_capital(config)?;
    validate_windows(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    validate_dates(config)?;
    Ok(())
}

pub fn validate_decision_config(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    let days = config.get_int("decision", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if days <= 0 {
        return Err(invalid("decision", "lookback_days", "lookback_days must be positive"));
    }
    if days > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "decision",
            "lookback_days",
            &format!("lookback_days must be at most {}", MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(())
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    if let Some(locale) = config.get_string("report", "locale") {
        let locale = locale.trim().to_lowercase();
        if !SUPPORTED_LOCALES.contains(&locale.as_str()) {
            return Err(invalid(
                "report",
                "locale",
                &format!("unsupported locale '{}', expected one of en, zh", locale),
            ));
        }
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    match config.get_string("strategy", "symbol") {
        Some(s) if s.trim().is_empty() => Err(missing("strategy", "symbol")),
        _ => Ok(()),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    let value = config.get_double("strategy", "initial_capital", 100_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "strategy",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    let short = config.get_int("strategy", "sma_short", DEFAULT_SMA_SHORT as i64);
    let long = config.get_int("strategy", "sma_long", DEFAULT_SMA_LONG as i64);
    let rsi = config.get_int("strategy", "rsi_period", DEFAULT_RSI_PERIOD as i64);

    for (key, value) in [("sma_short", short), ("sma_long", long), ("rsi_period", rsi)] {
        if value <= 0 {
            return Err(invalid(
                "strategy",
                key,
                &format!("{} must be a positive number of bars", key),
            ));
        }
    }

    if short >= long {
        return Err(invalid(
            "strategy",
            "sma_short",
            "sma_short must be shorter than sma_long",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TrendsignalError> {
    let start_date = parse_date(config, "start_date", DEFAULT_START_DATE)?;
    let end_date = parse_date(config, "end_date", DEFAULT_END_DATE)?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

/// Reads a `[backtest]` date, falling back to `default` when the key is absent.
///
/// A key that is present but blank is `ConfigMissing`.
pub fn parse_date(
    config: &dyn ConfigPort,
    field: &str,
    default: &str,
) -> Result<NaiveDate, TrendsignalError> {
    let value = match config.get_string("backtest", field) {
        Some(v) if v.trim().is_empty() => return Err(missing("backtest", field)),
        Some(v) => v,
        None => default.to_string(),
    };
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            field,
            &format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

/// Key present in the file with no value.
fn missing(section: &str, key: &str) -> TrendsignalError {
    TrendsignalError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TrendsignalError {
    TrendsignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
