//! Error category types for granular error handling.

use std::time::Duration;
use thiserror::Error;

use crate::types::FileStatus;

/// Configuration-related errors.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("No API key provided. Pass an API key or set MEMIC_API_KEY")]
    MissingApiKey,

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Authentication-related errors (HTTP 401 / 403).
#[derive(Error, Debug, Clone)]
pub enum AuthenticationError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Caller input rejected before any remote call was made.
#[derive(Error, Debug, Clone)]
pub enum RequestError {
    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<ValidationDetail> },

    #[error("File not found: {path}")]
    LocalFile { path: String, message: String },
}

/// Validation detail for field-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    pub field: String,
    pub description: String,
}

impl ValidationDetail {
    /// Creates a detail for `field`.
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// No response was obtained from the remote side.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timed out")]
    Timeout,
}

/// Resource lookups that came back empty (HTTP 404).
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("{message}")]
    NotFound { message: String },
}

/// Any other non-success status returned by the service or the storage target.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<String>,
    },
}

/// A success status whose body could not be understood.
#[derive(Error, Debug, Clone)]
pub enum ResponseError {
    #[error("Failed to deserialize response: {message}")]
    Deserialization { message: String },

    #[error("Unexpected response format: {message}")]
    UnexpectedFormat { message: String },
}

/// Remote processing outcomes observed while waiting for a file.
#[derive(Error, Debug, Clone)]
pub enum ProcessingError {
    #[error("File processing failed with status {status}: {}", .message.as_deref().unwrap_or("Unknown error"))]
    Failed {
        file_id: String,
        status: FileStatus,
        message: Option<String>,
    },

    #[error("Timeout waiting for file to be ready after {waited:?}. Current status: {last_status}")]
    PollTimeout {
        file_id: String,
        last_status: FileStatus,
        waited: Duration,
    },
}
