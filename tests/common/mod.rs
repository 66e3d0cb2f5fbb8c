#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use trendsignal::domain::backtest::{BacktestConfig, BacktestResult};
use trendsignal::domain::decision::Decision;
use trendsignal::domain::error::TrendsignalError;
use trendsignal::domain::price::{PriceBar, PriceSeries};
use trendsignal::ports::data_port::DataPort;
use trendsignal::ports::report_port::{ChartPort, ReportPort};

/// In-memory price source; filters to the requested range like the CSV adapter.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrendsignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendsignalError::DataFetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        if bars.is_empty() {
            return Err(TrendsignalError::DataFetch {
                symbol: symbol.to_string(),
                reason: format!("no bars between {} and {}", start_date, end_date),
            });
        }
        PriceSeries::new(symbol, bars)
    }
}

/// Captures everything written to it.
#[derive(Default)]
pub struct RecordingReport {
    pub decisions: Vec<Decision>,
    pub backtests: Vec<BacktestResult>,
}

impl ReportPort for RecordingReport {
    fn write_decision(&mut self, decision: &Decision) -> Result<(), TrendsignalError> {
        self.decisions.push(decision.clone());
        Ok(())
    }

    fn write_backtest(
        &mut self,
        _config: &BacktestConfig,
        result: &BacktestResult,
    ) -> Result<(), TrendsignalError> {
        self.backtests.push(result.clone());
        Ok(())
    }
}

/// Records chart paths instead of writing files; optionally fails every render.
#[derive(Default)]
pub struct RecordingChart {
    pub rendered: RefCell<Vec<PathBuf>>,
    pub fail: bool,
}

impl RecordingChart {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl ChartPort for RecordingChart {
    fn render(&self, _result: &BacktestResult, output_path: &Path) -> Result<(), TrendsignalError> {
        if self.fail {
            return Err(TrendsignalError::Io(std::io::Error::other(format!(
                "cannot write {}",
                output_path.display()
            ))));
        }
        self.rendered.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2023, 1, 1)
}

/// One bar per calendar day starting at `start_date()`.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start_date() + Duration::days(i as i64), close))
        .collect()
}

pub fn constant_closes(n: usize, price: f64) -> Vec<f64> {
    vec![price; n]
}

/// Net uptrend of +0.25 per bar: +2.0 on odd steps, -1.5 on even steps.
///
/// Starting at 173.5, 300 bars end exactly at 250.0.
pub fn zigzag_closes(n: usize, first: f64) -> Vec<f64> {
    let mut closes = Vec::with_capacity(n);
    let mut price = first;
    for t in 0..n {
        if t > 0 {
            price += if t % 2 == 1 { 2.0 } else { -1.5 };
        }
        closes.push(price);
    }
    closes
}

pub fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, bars_from_closes(closes)).unwrap()
}

pub fn last_date(n: usize) -> NaiveDate {
    start_date() + Duration::days(n as i64 - 1)
}
