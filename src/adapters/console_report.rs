//! Plain-text run reports, localized.
//!
//! One implementation serves every language: the locale only selects the
//! label table.

use std::io::Write;
use std::str::FromStr;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::decision::Decision;
use crate::domain::error::TrendsignalError;
use crate::domain::signal::Action;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportLocale {
    #[default]
    En,
    Zh,
}

impl FromStr for ReportLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(ReportLocale::En),
            "zh" => Ok(ReportLocale::Zh),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

struct Labels {
    symbol: &'static str,
    date: &'static str,
    price: &'static str,
    latest: &'static str,
    signal_line: &'static str,
    decision: &'static str,
    quantity: &'static str,
    based_on: &'static str,
    period: &'static str,
    evaluated: &'static str,
    days: &'static str,
    to: &'static str,
    strategy: &'static str,
    buy_and_hold: &'static str,
    cumulative: &'static str,
    cagr: &'static str,
    trades: &'static str,
    max_drawdown: &'static str,
    buy: &'static str,
    sell: &'static str,
    hold: &'static str,
}

const EN: Labels = Labels {
    symbol: "Symbol",
    date: "Date",
    price: "Current Price",
    latest: "Latest",
    signal_line: "Signal",
    decision: "Decision Signal",
    quantity: "Recommended shares to trade",
    based_on: "based on initial capital",
    period: "Backtest period",
    evaluated: "Evaluated returns",
    days: "days",
    to: "to",
    strategy: "Strategy",
    buy_and_hold: "Buy & Hold",
    cumulative: "cumulative return",
    cagr: "CAGR",
    trades: "Total number of trades",
    max_drawdown: "max drawdown",
    buy: "Buy",
    sell: "Sell",
    hold: "Hold",
};

const ZH: Labels = Labels {
    symbol: "股票代码",
    date: "日期",
    price: "当前价格",
    latest: "最新",
    signal_line: "信号线",
    decision: "决策信号",
    quantity: "建议交易股数",
    based_on: "基于初始资金",
    period: "回测区间",
    evaluated: "有效收益区间",
    days: "天",
    to: "至",
    strategy: "策略",
    buy_and_hold: "买入持有",
    cumulative: "累计收益",
    cagr: "年化收益",
    trades: "总交易次数",
    max_drawdown: "最大回撤",
    buy: "买入",
    sell: "卖出",
    hold: "持有",
};

impl ReportLocale {
    fn labels(self) -> &'static Labels {
        match self {
            ReportLocale::En => &EN,
            ReportLocale::Zh => &ZH,
        }
    }

    pub fn action_label(self, action: Action) -> &'static str {
        let l = self.labels();
        match action {
            Action::Buy => l.buy,
            Action::Sell => l.sell,
            Action::Hold => l.hold,
        }
    }
}

pub struct ConsoleReport<W: Write> {
    out: W,
    locale: ReportLocale,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W, locale: ReportLocale) -> Self {
        Self { out, locale }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

impl<W: Write> ReportPort for ConsoleReport<W> {
    fn write_decision(&mut self, d: &Decision) -> Result<(), TrendsignalError> {
        let l = self.locale.labels();
        let ind = &d.indicators;

        writeln!(self.out, "{}: {}", l.symbol, d.symbol)?;
        writeln!(self.out, "{}: {}", l.date, d.date)?;
        writeln!(self.out, "{}: {:.2} USD", l.price, d.last_price)?;
        writeln!(
            self.out,
            "{} SMA{}: {:.2}, SMA{}: {:.2}",
            l.latest, d.params.sma_short, ind.sma_short, d.params.sma_long, ind.sma_long
        )?;
        writeln!(self.out, "{} RSI({}): {:.2}", l.latest, d.params.rsi_period, ind.rsi)?;
        writeln!(
            self.out,
            "{} MACD: {:.4}, {}: {:.4}",
            l.latest, ind.macd, l.signal_line, ind.macd_signal
        )?;
        writeln!(
            self.out,
            "{}: {}",
            l.decision,
            self.locale.action_label(d.action)
        )?;
        writeln!(
            self.out,
            "{}: {} ({} {:.0} USD)",
            l.quantity, d.quantity, l.based_on, d.capital
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn write_backtest(
        &mut self,
        config: &BacktestConfig,
        result: &BacktestResult,
    ) -> Result<(), TrendsignalError> {
        let l = self.locale.labels();
        let s = &result.summary;

        writeln!(
            self.out,
            "{} ({}): {} {} {}",
            l.period, result.returns.symbol, config.start_date, l.to, config.end_date
        )?;
        writeln!(
            self.out,
            "{}: {} {} {} ({} {})",
            l.evaluated, s.start_date, l.to, s.end_date, s.calendar_days, l.days
        )?;
        writeln!(
            self.out,
            "{} {}: {}, {}: {}",
            l.strategy,
            l.cumulative,
            pct(s.strategy_return),
            l.cagr,
            pct(s.strategy_cagr)
        )?;
        writeln!(
            self.out,
            "{} {}: {}, {}: {}",
            l.buy_and_hold,
            l.cumulative,
            pct(s.buy_and_hold_return),
            l.cagr,
            pct(s.buy_and_hold_cagr)
        )?;
        writeln!(self.out, "{}: {}", l.trades, s.trade_count)?;
        writeln!(
            self.out,
            "{} {}: -{}, {} {}: -{}",
            l.strategy,
            l.max_drawdown,
            pct(s.strategy_max_drawdown),
            l.buy_and_hold,
            l.max_drawdown,
            pct(s.buy_and_hold_max_drawdown)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::ReturnSeries;
    use crate::domain::frame::IndicatorRow;
    use crate::domain::metrics::PerformanceSummary;
    use crate::domain::strategy::StrategyParams;
    use chrono::NaiveDate;

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            symbol: "TSLA".into(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
            params: StrategyParams::default(),
        }
    }

    fn sample_decision(action: Action, quantity: u64) -> Decision {
        let date = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        Decision {
            symbol: "TSLA".into(),
            date,
            last_price: 250.0,
            capital: 100_000.0,
            params: StrategyParams::default(),
            indicators: IndicatorRow {
                date,
                close: 250.0,
                sma_short: 260.123,
                sma_long: 240.5,
                rsi: 55.5,
                macd: 1.23456,
                macd_signal: 1.0,
            },
            action,
            quantity,
        }
    }

    fn sample_result() -> BacktestResult {
        BacktestResult {
            returns: ReturnSeries {
                symbol: "TSLA".into(),
                rows: vec![],
            },
            summary: PerformanceSummary {
                start_date: NaiveDate::from_ymd_opt(2020, 10, 16).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 4, 4).unwrap(),
                calendar_days: 1631,
                strategy_return: 0.5,
                buy_and_hold_return: 1.25,
                strategy_cagr: 0.0951,
                buy_and_hold_cagr: 0.1971,
                trade_count: 17,
                strategy_max_drawdown: 0.3,
                buy_and_hold_max_drawdown: 0.65,
            },
        }
    }

    fn render_decision(locale: ReportLocale, d: &Decision) -> String {
        let mut report = ConsoleReport::new(Vec::new(), locale);
        report.write_decision(d).unwrap();
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn decision_report_english() {
        let text = render_decision(ReportLocale::En, &sample_decision(Action::Buy, 400));

        assert!(text.contains("Symbol: TSLA"));
        assert!(text.contains("Current Price: 250.00 USD"));
        assert!(text.contains("Latest SMA50: 260.12, SMA200: 240.50"));
        assert!(text.contains("Latest RSI(14): 55.50"));
        assert!(text.contains("Latest MACD: 1.2346, Signal: 1.0000"));
        assert!(text.contains("Decision Signal: Buy"));
        assert!(text.contains("Recommended shares to trade: 400 (based on initial capital 100000 USD)"));
    }

    #[test]
    fn decision_report_chinese() {
        let text = render_decision(ReportLocale::Zh, &sample_decision(Action::Hold, 0));

        assert!(text.contains("股票代码: TSLA"));
        assert!(text.contains("决策信号: 持有"));
        assert!(text.contains("建议交易股数: 0"));
    }

    #[test]
    fn backtest_report_english() {
        let mut report = ConsoleReport::new(Vec::new(), ReportLocale::En);
        report.write_backtest(&sample_config(), &sample_result()).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("Backtest period (TSLA): 2020-01-01 to 2025-04-07"));
        assert!(text.contains("Evaluated returns: 2020-10-16 to 2025-04-04 (1631 days)"));
        assert!(text.contains("Strategy cumulative return: 50.00%, CAGR: 9.51%"));
        assert!(text.contains("Buy & Hold cumulative return: 125.00%, CAGR: 19.71%"));
        assert!(text.contains("Total number of trades: 17"));
        assert!(text.contains("Strategy max drawdown: -30.00%"));
    }

    #[test]
    fn backtest_report_chinese() {
        let mut report = ConsoleReport::new(Vec::new(), ReportLocale::Zh);
        report.write_backtest(&sample_config(), &sample_result()).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("回测区间 (TSLA): 2020-01-01 至 2025-04-07"));
        assert!(text.contains("有效收益区间: 2020-10-16 至 2025-04-04 (1631 天)"));
        assert!(text.contains("总交易次数: 17"));
    }

    #[test]
    fn locale_from_str() {
        assert_eq!("en".parse::<ReportLocale>().unwrap(), ReportLocale::En);
        assert_eq!(" ZH ".parse::<ReportLocale>().unwrap(), ReportLocale::Zh);
        assert!("fr".parse::<ReportLocale>().is_err());
        assert_eq!(ReportLocale::default(), ReportLocale::En);
    }

    #[test]
    fn action_labels() {
        assert_eq!(ReportLocale::En.action_label(Action::Sell), "Sell");
        assert_eq!(ReportLocale::Zh.action_label(Action::Buy), "买入");
    }
}
