//! Daily closing-price series.

use chrono::NaiveDate;

use crate::domain::error::TrendsignalError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered daily closes for one symbol.
///
/// Dates are strictly increasing and every close is finite and positive.
/// The series is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, TrendsignalError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(TrendsignalError::DataFetch {
                symbol,
                reason: "no price bars".into(),
            });
        }

        if let Some(bad) = bars.iter().find(|b| !b.close.is_finite() || b.close <= 0.0) {
            return Err(TrendsignalError::DataFetch {
                reason: format!("invalid close {} on {}", bad.close, bad.date),
                symbol,
            });
        }

        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(TrendsignalError::DataFetch {
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    w[0].date, w[1].date
                ),
                symbol,
            });
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> &PriceBar {
        // non-empty by construction
        &self.bars[self.bars.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn accepts_ordered_bars() {
        let series = PriceSeries::new(
            "TSLA",
            vec![PriceBar::new(day(2), 100.0), PriceBar::new(day(3), 101.5)],
        )
        .unwrap();

        assert_eq!(series.symbol(), "TSLA");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.5]);
        assert_eq!(series.last().date, day(3));
    }

    #[test]
    fn rejects_empty() {
        let err = PriceSeries::new("TSLA", vec![]).unwrap_err();
        assert!(matches!(err, TrendsignalError::DataFetch { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(
            "TSLA",
            vec![PriceBar::new(day(2), 100.0), PriceBar::new(day(2), 101.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = PriceSeries::new(
            "TSLA",
            vec![PriceBar::new(day(5), 100.0), PriceBar::new(day(4), 101.0)],
        )
        .unwrap_err();
        assert!(matches!(err, TrendsignalError::DataFetch { .. }));
    }

    #[test]
    fn rejects_non_positive_close() {
        let err = PriceSeries::new(
            "TSLA",
            vec![PriceBar::new(day(2), 100.0), PriceBar::new(day(3), 0.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid close"));

        let err = PriceSeries::new("TSLA", vec![PriceBar::new(day(2), f64::NAN)]).unwrap_err();
        assert!(matches!(err, TrendsignalError::DataFetch { .. }));
    }
}
