//! Reqwest-based HTTP transport implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::error::TransportError;
use super::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Reqwest-based HTTP transport.
///
/// One connection pool serves both the Memic API and presigned storage
/// targets. Error messages never include the request URL.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a client-wide request timeout and connect timeout.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn header_map(headers: HashMap<String, String>) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::Request(format!("invalid header name: {}", name)))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|_| TransportError::Request(format!("invalid value for header {}", name)))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    fn response_headers(headers: &HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()
    }

    /// Maps a reqwest failure, dropping the URL so presigned signatures stay out of errors.
    fn transport_error(err: reqwest::Error, context: &str) -> TransportError {
        if err.is_timeout() {
            return TransportError::Timeout;
        }
        let is_body = err.is_body() || err.is_decode();
        let message = format!("{}: {}", context, err.without_url());
        if is_body {
            TransportError::Request(message)
        } else {
            TransportError::Connection(message)
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Self::header_map(request.headers)?;

        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url)
            .headers(headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(e, "request failed"))?;

        let status = response.status().as_u16();
        let headers = Self::response_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(e, "failed to read response body"))?;

        Ok(HttpResponse { status, headers, body })
    }
}
