use reqwest::StatusCode;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Unknown scenario, field or malformed session command
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Narrative provider refused the call because of rate limiting
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Upstream API error
    #[error("Upstream error ({status}): {message}")]
    UpstreamError { status: StatusCode, message: String },
    /// HTTP request error (connect, timeout, body decoding)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Whether the error signals upstream rate limiting.
    ///
    /// Only rate limiting is retried by the narrative layer; everything else
    /// is reported immediately.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::UpstreamError { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS,
            Self::HttpRequest(e) => e.status() == Some(StatusCode::TOO_MANY_REQUESTS),
            _ => false,
        }
    }

    /// Short machine-readable name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config_error",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::RateLimited(_) => "rate_limited",
            Self::UpstreamError { .. } => "upstream_error",
            Self::HttpRequest(_) => "http_request_error",
            Self::Serialization(_) => "serialization_error",
            Self::Io(_) => "io_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
