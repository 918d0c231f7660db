//! Endpoint path constants and builder functions for the Memic API.
//!
//! Paths are relative to the configured base URL.

/// API key context endpoint.
pub const ME: &str = "/sdk/me";

/// Projects listing endpoint.
pub const PROJECTS: &str = "/sdk/projects";

/// Base path for files endpoints.
pub const FILES: &str = "/sdk/files";

/// Search endpoint.
pub const SEARCH: &str = "/sdk/search";

/// Constructs the upload initiation path.
///
/// # Example
///
/// ```
/// use integrations_memic::transport::endpoints;
///
/// assert_eq!(endpoints::init_upload(), "/sdk/files/init");
/// ```
pub fn init_upload() -> String {
    format!("{}/init", FILES)
}

/// Constructs the path confirming a completed transfer.
///
/// # Example
///
/// ```
/// use integrations_memic::transport::endpoints;
///
/// assert_eq!(endpoints::confirm_upload("abc"), "/sdk/files/abc/confirm");
/// ```
pub fn confirm_upload(file_id: &str) -> String {
    format!("{}/{}/confirm", FILES, file_id)
}

/// Constructs the status-check path for a file.
pub fn file_status(file_id: &str) -> String {
    format!("{}/{}/status", FILES, file_id)
}

/// Constructs the path for a specific file.
pub fn file(file_id: &str) -> String {
    format!("{}/{}", FILES, file_id)
}
