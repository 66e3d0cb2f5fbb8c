//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for trendsignal.
#[derive(Debug, thiserror::Error)]
pub enum TrendsignalError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to fetch prices for {symbol}: {reason}")]
    DataFetch { symbol: String, reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("degenerate date range {start} to {end}: cannot annualize returns")]
    DegenerateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrendsignalError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            TrendsignalError::Io(_) => 1,
            TrendsignalError::ConfigParse { .. }
            | TrendsignalError::ConfigMissing { .. }
            | TrendsignalError::ConfigInvalid { .. } => 2,
            TrendsignalError::DataFetch { .. } => 3,
            TrendsignalError::InsufficientData { .. }
            | TrendsignalError::DegenerateRange { .. } => 5,
            TrendsignalError::InvalidParameter { .. } => 6,
        }
    }
}

impl From<&TrendsignalError> for std::process::ExitCode {
    fn from(err: &TrendsignalError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
