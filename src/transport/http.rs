//! Core HTTP transport abstractions for the Memic API client.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use super::error::TransportError;
use crate::auth::API_KEY_HEADER;

/// One HTTP exchange as seen by the transport.
///
/// Control-plane requests target the Memic base URL and carry the API key.
/// The presigned transfer targets the storage URL returned by the service and
/// carries no credential header.
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
    /// Per-request timeout overriding the client-wide one.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// URL without its query string. Presigned URLs carry their signature there.
    pub fn url_without_query(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(base, _)| base)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: HashMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(API_KEY_HEADER) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url_without_query())
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP methods used by the Memic API and presigned storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Reads: projects, key context, file status.
    Get,
    /// Upload initiation and confirmation, search.
    Post,
    /// Presigned transfer.
    Put,
    /// File removal.
    Delete,
}

/// HTTP response from the transport layer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keys lower-cased by the production transport.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

/// HTTP transport abstraction for testability.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and receive a response.
    ///
    /// Any status code counts as a response; only failures to obtain one are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
