//! Validation functions for file operations.
//!
//! Everything here runs before the first remote call.

use std::path::Path;

use crate::error::{MemicError, MemicResult, RequestError, ValidationDetail};
use crate::types::PollConfig;

/// MIME type used when the extension gives no hint.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Facts about a local file gathered before the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Final path component.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type guessed from the extension.
    pub mime_type: String,
}

/// Validate an identifier that is placed into a request path.
pub fn validate_identifier(field: &str, value: &str) -> MemicResult<()> {
    let description = if value.trim().is_empty() {
        "must not be empty"
    } else if value.contains(|c: char| matches!(c, '/' | '?' | '#')) {
        "must not contain '/', '?' or '#'"
    } else {
        return Ok(());
    };

    Err(MemicError::validation(
        format!("Invalid {}", field),
        vec![ValidationDetail::new(field, description)],
    ))
}

/// Validate polling parameters.
///
/// The interval must be non-zero and the timeout at least one interval.
pub fn validate_poll_config(config: &PollConfig) -> MemicResult<()> {
    let mut details = Vec::new();

    if config.interval.is_zero() {
        details.push(ValidationDetail::new("poll_interval", "must be greater than zero"));
    }

    if config.timeout < config.interval {
        details.push(ValidationDetail::new(
            "poll_timeout",
            format!(
                "must be at least poll_interval ({:?}), got {:?}",
                config.interval, config.timeout
            ),
        ));
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(MemicError::validation("Invalid polling configuration", details))
    }
}

/// Inspect the local file: it must exist and be a regular file.
pub async fn inspect_local_file(path: &Path) -> MemicResult<LocalFile> {
    let local_error = |message: String| -> MemicError {
        RequestError::LocalFile {
            path: path.display().to_string(),
            message,
        }
        .into()
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| local_error(e.to_string()))?;

    if !metadata.is_file() {
        return Err(local_error("not a regular file".to_string()));
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| local_error("path has no file name".to_string()))?;

    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    Ok(LocalFile {
        filename,
        size: metadata.len(),
        mime_type,
    })
}
