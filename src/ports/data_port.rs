//! Price data access port trait.

use crate::domain::error::TrendsignalError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `symbol` with dates in `[start_date, end_date]`.
    ///
    /// An empty or malformed result is a `DataFetch` error, never an empty series.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TrendsignalError>;
}
