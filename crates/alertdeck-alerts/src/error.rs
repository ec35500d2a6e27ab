//! Alerting error types

use std::time::Duration;

use alertdeck_http::HttpError;
use thiserror::Error;

/// Errors surfaced by backend calls and synchronization
#[derive(Debug, Error)]
pub enum AlertsError {
    /// Transport failure, exhausted retries or a 5xx answer
    #[error("Alerting backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The per-call timeout elapsed
    #[error("Alerting backend call timed out after {0:?}")]
    Timeout(Duration),

    /// The addressed resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx answer
    #[error("Request rejected by alerting backend ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a payload we could not decode
    #[error("Failed to decode backend payload: {0}")]
    Decode(String),

    /// The request cannot be issued as given
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some sub-writes of a create or update failed; none were rolled back
    #[error("{failed} of {attempted} writes failed")]
    PartialAggregateFailure { failed: usize, attempted: usize },

    /// The backend client could not be built from configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AlertsError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AlertsError::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AlertsError::InvalidInput(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AlertsError::NotFound(_))
    }

    /// Transport-level failure, timeouts included
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            AlertsError::BackendUnavailable(_) | AlertsError::Timeout(_)
        )
    }
}

impl From<HttpError> for AlertsError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(after) => AlertsError::Timeout(after),
            HttpError::HttpStatus { status, message } if status.as_u16() == 404 => {
                AlertsError::NotFound(message)
            }
            HttpError::HttpStatus { status, message } if status.is_client_error() => {
                AlertsError::Rejected {
                    status: status.as_u16(),
                    message,
                }
            }
            HttpError::Json(e) => AlertsError::Decode(e.to_string()),
            HttpError::InvalidUrl(msg) => AlertsError::InvalidInput(msg),
            HttpError::InvalidProxy(msg) | HttpError::BuildError(msg) => AlertsError::Config(msg),
            other => AlertsError::BackendUnavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AlertsError {
    fn from(err: serde_json::Error) -> Self {
        AlertsError::Decode(err.to_string())
    }
}

impl From<alertdeck_config::ConfigError> for AlertsError {
    fn from(err: alertdeck_config::ConfigError) -> Self {
        AlertsError::Config(err.to_string())
    }
}

/// Result type for alerting operations
pub type Result<T> = std::result::Result<T, AlertsError>;
