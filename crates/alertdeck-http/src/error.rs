//! HTTP client error types

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// HTTP error status
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Response body could not be encoded or decoded as JSON
    #[error("JSON body error: {0}")]
    Json(#[from] serde_json::Error),

    /// Retry limit exceeded
    #[error("Retry limit exceeded after {attempts} attempts: {last}")]
    RetryLimitExceeded { attempts: u32, last: String },

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::RequestFailed(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            HttpError::Timeout(_) => true,
            HttpError::HttpStatus { status, .. } => {
                // 5xx and 429 only; other client errors are final
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Status code carried by the error, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            HttpError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }

    /// Check if the call never produced a usable answer (transport failure,
    /// timeout, exhausted retries or a 5xx)
    pub fn is_unavailable(&self) -> bool {
        match self {
            HttpError::RequestFailed(_)
            | HttpError::Timeout(_)
            | HttpError::RetryLimitExceeded { .. } => true,
            HttpError::HttpStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
