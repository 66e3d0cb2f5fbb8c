//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, TimeDelta};
use clap::{Parser, Subcommand};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_svg::{ChartStyle, SvgChartAdapter};
use crate::adapters::console_report::{ConsoleReport, ReportLocale};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::returns_csv::write_returns;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_decision_config, validate_report_config,
    validate_strategy_config, DEFAULT_END_DATE, DEFAULT_LOOKBACK_DAYS, DEFAULT_START_DATE,
};
use crate::domain::decision::{decide, Decision};
use crate::domain::error::TrendsignalError;
use crate::domain::strategy::{
    StrategyParams, DEFAULT_RSI_PERIOD, DEFAULT_SMA_LONG, DEFAULT_SMA_SHORT,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ChartPort, ReportPort};

pub const DEFAULT_SYMBOL: &str = "TSLA";
pub const DEFAULT_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_CSV_DIR: &str = "data";
pub const DEFAULT_CHART_PATH: &str = "cumulative_returns.svg";
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

#[derive(Parser, Debug)]
#[command(name = "trendsignal", about = "SMA/RSI/MACD trend signal and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the Buy/Sell/Hold decision for the latest bar
    Decide {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
        /// Last date to consider (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Run a historical backtest against buy-and-hold
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// SVG chart output path
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Per-day returns CSV output path
        #[arg(long)]
        returns: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Overrides for a decision run; `None` falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct DecideOptions {
    pub symbol: Option<String>,
    pub capital: Option<f64>,
    pub as_of: Option<NaiveDate>,
}

/// Overrides for a backtest run; `None` falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct BacktestOptions {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub chart: Option<PathBuf>,
    pub returns: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Decide {
            config,
            symbol,
            capital,
            as_of,
        } => run_decide(&config, symbol, capital, as_of.as_deref()),
        Command::Backtest {
            config,
            symbol,
            start,
            end,
            chart,
            returns,
        } => run_backtest_command(
            &config,
            symbol,
            start.as_deref(),
            end.as_deref(),
            chart,
            returns,
        ),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TrendsignalError> {
    FileConfigAdapter::from_file(path).map_err(|e| TrendsignalError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn run_decide(
    config_path: &Path,
    symbol: Option<String>,
    capital: Option<f64>,
    as_of: Option<&str>,
) -> Result<(), TrendsignalError> {
    info!("loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let options = DecideOptions {
        symbol,
        capital,
        as_of: as_of.map(|s| parse_cli_date("as_of", s)).transpose()?,
    };

    let data = build_data_port(&config);
    let mut report = ConsoleReport::new(io::stdout(), build_locale(&config)?);
    execute_decide(&config, &data, &mut report, &options)?;
    Ok(())
}

fn run_backtest_command(
    config_path: &Path,
    symbol: Option<String>,
    start: Option<&str>,
    end: Option<&str>,
    chart: Option<PathBuf>,
    returns: Option<PathBuf>,
) -> Result<(), TrendsignalError> {
    info!("loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let options = BacktestOptions {
        symbol,
        start: start.map(|s| parse_cli_date("start", s)).transpose()?,
        end: end.map(|s| parse_cli_date("end", s)).transpose()?,
        chart,
        returns,
    };

    let locale = build_locale(&config)?;
    let data = build_data_port(&config);
    let chart = SvgChartAdapter::new(build_chart_style(&config, locale));
    let mut report = ConsoleReport::new(io::stdout(), locale);
    execute_backtest(&config, &data, &chart, &mut report, &options)?;
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TrendsignalError> {
    let config = load_config(config_path)?;
    validate_strategy_config(&config)?;
    validate_backtest_config(&config)?;
    validate_decision_config(&config)?;
    validate_report_config(&config)?;
    println!("Configuration is valid: {}", config_path.display());
    Ok(())
}

/// Validates the config, fetches the trailing window and writes the decision.
pub fn execute_decide(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    report: &mut dyn ReportPort,
    options: &DecideOptions,
) -> Result<Decision, TrendsignalError> {
    validate_strategy_config(config)?;
    validate_decision_config(config)?;

    let symbol = resolve_symbol(options.symbol.as_deref(), config);
    let capital = resolve_capital(options.capital, config)?;
    let params = build_params(config);
    let as_of = options.as_of.unwrap_or_else(|| Local::now().date_naive());
    let (start, end) = decision_window(
        as_of,
        config.get_int("decision", "lookback_days", DEFAULT_LOOKBACK_DAYS),
    )?;

    let prices = data.fetch_prices(&symbol, start, end)?;
    info!("{}: fetched {} bars for {} to {}", symbol, prices.len(), start, end);

    let decision = decide(&prices, capital, &params)?;
    report.write_decision(&decision)?;
    Ok(decision)
}

/// Validates the config, runs the backtest and writes every output.
///
/// The chart and the optional returns CSV are written before the summary, so
/// a failed file write never follows a printed report.
pub fn execute_backtest(
    config: &dyn ConfigPort,
    data: &dyn DataPort,
    chart: &dyn ChartPort,
    report: &mut dyn ReportPort,
    options: &BacktestOptions,
) -> Result<BacktestResult, TrendsignalError> {
    validate_strategy_config(config)?;
    let bt_config = build_backtest_config(config, options)?;

    let prices = data.fetch_prices(&bt_config.symbol, bt_config.start_date, bt_config.end_date)?;
    info!(
        "{}: fetched {} bars for {} to {}",
        bt_config.symbol,
        prices.len(),
        bt_config.start_date,
        bt_config.end_date
    );

    let result = run_backtest(&prices, &bt_config.params)?;

    let chart_path = options.chart.clone().unwrap_or_else(|| {
        PathBuf::from(config.get_string_or("report", "chart_path", DEFAULT_CHART_PATH))
    });
    chart.render(&result, &chart_path)?;

    if let Some(path) = resolve_returns_path(options.returns.as_deref(), config) {
        write_returns(&result.returns, &path)?;
    }

    report.write_backtest(&bt_config, &result)?;
    Ok(result)
}

/// `--returns` wins; otherwise `[report] returns_path` when set and non-blank.
pub fn resolve_returns_path(
    returns_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Option<PathBuf> {
    returns_override.map(Path::to_path_buf).or_else(|| {
        config
            .get_string("report", "returns_path")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

pub fn build_data_port(config: &dyn ConfigPort) -> CsvAdapter {
    CsvAdapter::new(PathBuf::from(config.get_string_or(
        "data",
        "csv_dir",
        DEFAULT_CSV_DIR,
    )))
}

/// Indicator windows from `[strategy]`; call after `validate_strategy_config`.
pub fn build_params(config: &dyn ConfigPort) -> StrategyParams {
    let window = |key: &str, default: usize| {
        usize::try_from(config.get_int("strategy", key, default as i64)).unwrap_or(default)
    };
    StrategyParams::new(
        window("sma_short", DEFAULT_SMA_SHORT),
        window("sma_long", DEFAULT_SMA_LONG),
        window("rsi_period", DEFAULT_RSI_PERIOD),
    )
}

pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> String {
    symbol_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.get_string_or("strategy", "symbol", DEFAULT_SYMBOL))
}

pub fn resolve_capital(
    capital_override: Option<f64>,
    config: &dyn ConfigPort,
) -> Result<f64, TrendsignalError> {
    let capital = capital_override
        .unwrap_or_else(|| config.get_double("strategy", "initial_capital", DEFAULT_CAPITAL));
    if !capital.is_finite() || capital <= 0.0 {
        return Err(TrendsignalError::InvalidParameter {
            name: "capital".into(),
            reason: format!("must be positive, got {capital}"),
        });
    }
    Ok(capital)
}

/// Date range, symbol and windows for a backtest; CLI overrides win over `[backtest]`.
pub fn build_backtest_config(
    config: &dyn ConfigPort,
    options: &BacktestOptions,
) -> Result<BacktestConfig, TrendsignalError> {
    let start_date = match options.start {
        Some(d) => d,
        None => parse_date(config, "start_date", DEFAULT_START_DATE)?,
    };
    let end_date = match options.end {
        Some(d) => d,
        None => parse_date(config, "end_date", DEFAULT_END_DATE)?,
    };

    if start_date >= end_date {
        return Err(TrendsignalError::InvalidParameter {
            name: "start".into(),
            reason: format!("start date {start_date} must be before end date {end_date}"),
        });
    }

    Ok(BacktestConfig {
        symbol: resolve_symbol(options.symbol.as_deref(), config),
        start_date,
        end_date,
        params: build_params(config),
    })
}

pub fn build_locale(config: &dyn ConfigPort) -> Result<ReportLocale, TrendsignalError> {
    validate_report_config(config)?;
    config
        .get_string_or("report", "locale", "en")
        .parse()
        .map_err(|reason| TrendsignalError::ConfigInvalid {
            section: "report".into(),
            key: "locale".into(),
            reason,
        })
}

pub fn build_chart_style(config: &dyn ConfigPort, locale: ReportLocale) -> ChartStyle {
    ChartStyle::new(
        locale,
        &config.get_string_or("report", "font_family", DEFAULT_FONT_FAMILY),
    )
}

/// Inclusive `[as_of - lookback_days, as_of]`.
pub fn decision_window(
    as_of: NaiveDate,
    lookback_days: i64,
) -> Result<(NaiveDate, NaiveDate), TrendsignalError> {
    TimeDelta::try_days(lookback_days)
        .and_then(|span| as_of.checked_sub_signed(span))
        .map(|start| (start, as_of))
        .ok_or_else(|| TrendsignalError::ConfigInvalid {
            section: "decision".into(),
            key: "lookback_days".into(),
            reason: format!("lookback of {lookback_days} days before {as_of} is out of range"),
        })
}

fn parse_cli_date(name: &str, value: &str) -> Result<NaiveDate, TrendsignalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TrendsignalError::InvalidParameter {
            name: name.to_string(),
            reason: format!("invalid date '{value}', expected YYYY-MM-DD"),
        }
    })
}
