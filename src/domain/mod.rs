//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod frame;
pub mod indicator;
pub mod metrics;
pub mod price;
pub mod signal;
pub mod strategy;
