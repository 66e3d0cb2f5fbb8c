//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with the SMA of its first
//! `signal` valid values
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: slow - 1 + signal - 1 bars (33 for defaults)

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::price::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Bars needed before the default MACD signal line is defined.
pub const DEFAULT_REQUIRED_BARS: usize = DEFAULT_SLOW + DEFAULT_SIGNAL - 1;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let ema_fast = calculate_ema(bars, fast);
    let ema_slow = calculate_ema(bars, slow);

    let macd_line: Vec<Option<f64>> = (0..bars.len())
        .map(|i| match (ema_fast.simple_at(i), ema_slow.simple_at(i)) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let line_start = macd_line.iter().position(Option::is_some);
    let mut signal_line: Vec<Option<f64>> = vec![None; bars.len()];
    if let Some(start) = line_start {
        let defined: Vec<f64> = macd_line[start..].iter().flatten().copied().collect();
        for (offset, value) in ema_values(&defined, signal_period).into_iter().enumerate() {
            signal_line[start + offset] = value;
        }
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match (macd_line[i], signal_line[i]) {
            (Some(line), Some(signal)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                },
            },
            (line, _) => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Macd {
                    line: line.unwrap_or(0.0),
                    signal: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    fn rising(n: usize) -> Vec<PriceBar> {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_bars(&prices)
    }

    #[test]
    fn macd_warmup_default() {
        let series = calculate_macd_default(&rising(40));

        let warmup = DEFAULT_SLOW - 1 + DEFAULT_SIGNAL - 1;
        for i in 0..warmup {
            assert!(!series.values[i].valid, "Index {} should not be valid", i);
        }
        assert!(series.values[warmup].valid, "Index {} should be valid", warmup);
        assert_eq!(warmup + 1, DEFAULT_REQUIRED_BARS);
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let series = calculate_macd(&bars, 3, 5, 2);

        let ema_fast = calculate_ema(&bars, 3);
        let ema_slow = calculate_ema(&bars, 5);

        for i in 0..bars.len() {
            if let Some((line, _)) = series.macd_at(i) {
                let expected = ema_fast.simple_at(i).unwrap() - ema_slow.simple_at(i).unwrap();
                assert!((line - expected).abs() < f64::EPSILON, "mismatch at {}", i);
            }
        }
    }

    #[test]
    fn macd_signal_seed_is_mean_of_first_lines() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0, 14.0, 18.0, 17.0, 21.0]);
        let series = calculate_macd(&bars, 2, 3, 3);

        let ema_fast = calculate_ema(&bars, 2);
        let ema_slow = calculate_ema(&bars, 3);
        let line = |i: usize| ema_fast.simple_at(i).unwrap() - ema_slow.simple_at(i).unwrap();

        // line defined from index 2, signal from index 4
        assert!(series.macd_at(3).is_none());
        let seed = (line(2) + line(3) + line(4)) / 3.0;
        let (_, signal) = series.macd_at(4).unwrap();
        assert!((signal - seed).abs() < 1e-12);

        let k = 2.0 / 4.0;
        let (_, next) = series.macd_at(5).unwrap();
        assert!((next - (line(5) * k + seed * (1.0 - k))).abs() < 1e-12);
    }

    #[test]
    fn macd_constant_prices_is_zero() {
        let series = calculate_macd_default(&make_bars(&[100.0; 50]));
        let (line, signal) = series.macd_at(49).unwrap();
        assert!(line.abs() < 1e-12);
        assert!(signal.abs() < 1e-12);
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd(&make_bars(&[100.0, 101.0, 102.0]), 5, 10, 3);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_and_zero_period() {
        assert!(calculate_macd_default(&[]).values.is_empty());

        let bars = make_bars(&[100.0, 101.0, 102.0]);
        assert!(calculate_macd(&bars, 0, 26, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 0, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 26, 0).values.is_empty());
    }

    #[test]
    fn macd_too_short_has_no_valid_points() {
        let series = calculate_macd_default(&rising(DEFAULT_REQUIRED_BARS - 1));
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
