/// Result type alias for strategy-internal operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Failure inside a single retrieval strategy. Strategies log these and
/// return an empty batch; they never reach the caller of the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Invalid profile URL: {0}")]
    Url(String),

    #[error("Invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<webdriver_client::WebDriverError> for RetrievalError {
    fn from(err: webdriver_client::WebDriverError) -> Self {
        RetrievalError::Browser(err.to_string())
    }
}
