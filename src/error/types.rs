//! Main error type for the Memic API client.

use thiserror::Error;
use super::categories::*;
use crate::transport::TransportError;
use crate::types::FileStatus;

/// Result type alias for Memic operations.
pub type MemicResult<T> = Result<T, MemicError>;

/// Top-level error type for the Memic integration.
#[derive(Error, Debug, Clone)]
pub enum MemicError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Not found: {0}")]
    Resource(#[from] ResourceError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),
}

impl MemicError {
    /// Builds a validation error from field-level details.
    pub fn validation(message: impl Into<String>, details: Vec<ValidationDetail>) -> Self {
        MemicError::Request(RequestError::Validation {
            message: message.into(),
            details,
        })
    }

    /// Returns true if the caller's input was rejected locally.
    pub fn is_validation(&self) -> bool {
        matches!(self, MemicError::Request(_))
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MemicError::Authentication(AuthenticationError::Rejected { status, .. })
            | MemicError::Api(ApiError::Status { status, .. }) => Some(*status),
            MemicError::Resource(ResourceError::NotFound { .. }) => Some(404),
            _ => None,
        }
    }

    /// Returns the last observed file status for processing errors.
    pub fn last_status(&self) -> Option<FileStatus> {
        match self {
            MemicError::Processing(ProcessingError::Failed { status, .. }) => Some(*status),
            MemicError::Processing(ProcessingError::PollTimeout { last_status, .. }) => {
                Some(*last_status)
            }
            _ => None,
        }
    }

    /// Returns true if repeating the same call might succeed.
    ///
    /// Advisory only: the client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            MemicError::Network(_) | MemicError::Processing(ProcessingError::PollTimeout { .. }) => true,
            MemicError::Api(ApiError::Status { status, .. }) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<TransportError> for MemicError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => MemicError::Network(NetworkError::Timeout),
            TransportError::Connection(message) | TransportError::Request(message) => {
                MemicError::Network(NetworkError::ConnectionFailed { message })
            }
        }
    }
}

impl From<serde_json::Error> for MemicError {
    fn from(err: serde_json::Error) -> Self {
        MemicError::Response(ResponseError::Deserialization {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for MemicError {
    fn from(err: url::ParseError) -> Self {
        MemicError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}
