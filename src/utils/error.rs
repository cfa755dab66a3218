use thiserror::Error;

/// Fatal error categories. Any of these aborts the run before or instead of
/// contacting providers; per-query transport failures are `QueryError` and
/// never surface through this type.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Restaurant directory failed validation:\n  {}", problems.join("\n  "))]
    Load { problems: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No restaurants selected for batch run")]
    EmptyBatch,
}

impl CheckError {
    pub fn validation(message: impl Into<String>) -> Self {
        CheckError::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CheckError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// Per-task transport failures. The dispatcher converts these into a
/// `ProviderError` outcome for the affected restaurant/time.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider protocol error: {0}")]
    Protocol(String),
}

impl QueryError {
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            QueryError::Timeout(timeout_secs)
        } else if err.is_decode() {
            QueryError::Protocol(err.to_string())
        } else {
            QueryError::Network(err.to_string())
        }
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
