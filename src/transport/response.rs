//! HTTP response parser for the Memic API.
//!
//! This module provides the `ResponseParser` for classifying HTTP responses
//! and deserializing successful bodies.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{classify_response, MemicError, MemicResult};
use super::http::HttpResponse;

/// Parser for HTTP responses from the Memic API.
///
/// The `ResponseParser` handles:
/// - Status classification (auth, not found, generic API failure)
/// - Successful response deserialization
/// - Request ID extraction for debugging
pub struct ResponseParser;

impl ResponseParser {
    /// Classifies the response and deserializes a successful body into `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_memic::transport::{ResponseParser, HttpResponse};
    /// use bytes::Bytes;
    /// use serde::Deserialize;
    /// use std::collections::HashMap;
    ///
    /// #[derive(Deserialize)]
    /// struct Project {
    ///     name: String,
    /// }
    ///
    /// let response = HttpResponse {
    ///     status: 200,
    ///     headers: HashMap::new(),
    ///     body: Bytes::from(r#"{"name":"Docs"}"#),
    /// };
    ///
    /// let parsed: Project = ResponseParser::parse_response(response).unwrap();
    /// assert_eq!(parsed.name, "Docs");
    /// ```
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> MemicResult<T> {
        let response = Self::ensure_success(response)?;
        let parsed: T = serde_json::from_slice(&response.body)?;
        Ok(parsed)
    }

    /// Classifies the response, returning it untouched on 2xx.
    pub fn ensure_success(response: HttpResponse) -> MemicResult<HttpResponse> {
        match classify_response(response.status, &response.body) {
            Ok(()) => Ok(response),
            Err(error) => Err(Self::log_error(&response, error)),
        }
    }

    /// Classifies the response and discards its body.
    pub fn parse_empty(response: HttpResponse) -> MemicResult<()> {
        Self::ensure_success(response).map(|_| ())
    }

    fn log_error(response: &HttpResponse, error: MemicError) -> MemicError {
        if let Some(id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(
                request_id = %id,
                status = response.status,
                error = ?error,
                "API error occurred"
            );
        }
        error
    }

    /// Extracts the request ID from response headers for debugging.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_memic::transport::ResponseParser;
    /// use std::collections::HashMap;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert("X-Request-ID".to_string(), "abc123".to_string());
    ///
    /// let request_id = ResponseParser::extract_request_id(&headers);
    /// assert_eq!(request_id, Some("abc123".to_string()));
    /// ```
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        let possible_headers = ["x-request-id", "x-amz-request-id", "request-id"];

        headers
            .iter()
            .find(|(key, _)| possible_headers.contains(&key.to_lowercase().as_str()))
            .map(|(_, value)| value.clone())
    }
}
