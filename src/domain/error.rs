//! Domain error types.

/// Top-level error type for sellwatch.
#[derive(Debug, thiserror::Error)]
pub enum SellwatchError {
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

    #[error("price provider error for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },

    #[error("holdings error: {reason}")]
    Holdings { reason: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SellwatchError> for std::process::ExitCode {
    fn from(err: &SellwatchError) -> Self {
        let code: u8 = match err {
            SellwatchError::Io(_) => 1,
            SellwatchError::ConfigParse { .. }
            | SellwatchError::ConfigMissing { .. }
            | SellwatchError::ConfigInvalid { .. } => 2,
            SellwatchError::Provider { .. } => 3,
            SellwatchError::Holdings { .. } => 4,
            SellwatchError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
