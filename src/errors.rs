/// Domain-specific error types for the pricing service.
/// The engine validates its inputs locally and fails fast; it never clamps
/// or substitutes defaults, since silently altering a financial input would
/// corrupt the economic meaning of the result. Upstream data failures are
/// reported to the caller, not papered over.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported option type: {0}")]
    UnsupportedOptionType(String),

    #[error("upstream data unavailable: {0}")]
    DataUnavailable(String),

    #[error("upstream API error: {status} {body}")]
    UpstreamApi { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable machine-readable tag carried in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnsupportedOptionType(_) => "unsupported_option_type",
            Self::DataUnavailable(_) => "data_unavailable",
            Self::UpstreamApi { .. } => "upstream_api",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
