//! CSV file price data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv`. Columns are located by header name, so
//! both a bare `date,close` export and a full OHLCV download work. An adjusted
//! close column wins over the raw close when present.

use crate::domain::error::TrendsignalError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::debug;
use std::fs::File;
use std::path::PathBuf;

const DATE_COLUMNS: [&str; 1] = ["date"];
const CLOSE_COLUMNS: [&str; 4] = ["adj_close", "adj close", "adjclose", "close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrendsignalError> {
        let fetch_error = |reason: String| TrendsignalError::DataFetch {
            symbol: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let file = File::open(&path)
            .map_err(|e| fetch_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(file);
        let headers = rdr
            .headers()
            .map_err(|e| fetch_error(format!("CSV header error: {}", e)))?
            .clone();
        let date_idx = find_column(&headers, &DATE_COLUMNS)
            .ok_or_else(|| fetch_error("missing date column".into()))?;
        let close_idx = find_column(&headers, &CLOSE_COLUMNS)
            .ok_or_else(|| fetch_error("missing close column".into()))?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| fetch_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_idx)
                .ok_or_else(|| fetch_error(format!("row {}: missing date", line + 1)))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| fetch_error(format!("row {}: invalid date format: {}", line + 1, e)))?;

            if date < start_date || date > end_date {
                skipped += 1;
                continue;
            }

            let close: f64 = record
                .get(close_idx)
                .ok_or_else(|| fetch_error(format!("row {}: missing close", line + 1)))?
                .trim()
                .parse()
                .map_err(|e| fetch_error(format!("row {}: invalid close value: {}", line + 1, e)))?;

            bars.push(PriceBar::new(date, close));
        }

        debug!(
            "{}: read {} bars from {} ({} outside {} to {})",
            symbol,
            bars.len(),
            path.display(),
            skipped,
            start_date,
            end_date
        );

        if bars.is_empty() {
            return Err(fetch_error(format!(
                "no bars between {} and {}",
                start_date, end_date
            )));
        }

        bars.sort_by_key(|b| b.date);
        PriceSeries::new(symbol, bars)
    }
}
