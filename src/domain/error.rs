//! Domain error types.

/// Top-level error type for snaptrader.
#[derive(Debug, thiserror::Error)]
pub enum SnaptraderError {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("empty dataset: at least one stock row is required")]
    EmptyDataset,

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SnaptraderError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SnaptraderError::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl From<&SnaptraderError> for std::process::ExitCode {
    fn from(err: &SnaptraderError) -> Self {
        let code: u8 = match err {
            SnaptraderError::Io(_) => 1,
            SnaptraderError::ConfigParse { .. }
            | SnaptraderError::ConfigMissing { .. }
            | SnaptraderError::ConfigInvalid { .. } => 2,
            SnaptraderError::MalformedInput { .. } | SnaptraderError::EmptyDataset => 3,
            SnaptraderError::SymbolNotFound { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
