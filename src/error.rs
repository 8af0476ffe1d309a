use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("GitHub API server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Frame scheduling error: {0}")]
    SchedulerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PortfolioError {
    /// True for the 403 responses the GitHub API uses to signal quota exhaustion.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PortfolioError::RateLimitExceeded(_))
    }

    /// Transport failures and 5xx responses; everything else fails the same way twice.
    pub fn is_transient(&self) -> bool {
        matches!(self, PortfolioError::NetworkError(_) | PortfolioError::ServerError { .. })
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
