//! HTTP request builder for the Memic API.
//!
//! This module provides the `RequestBuilder` for constructing HTTP requests
//! with authentication, headers, and URL formatting.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthManager;
use crate::error::MemicResult;
use super::http::{HttpMethod, HttpRequest};

/// Builder for constructing HTTP requests to the Memic control-plane API.
///
/// The `RequestBuilder` handles:
/// - URL construction relative to the base URL (which may carry a path prefix)
/// - Authentication via the configured auth manager
/// - `User-Agent` and `Content-Type` headers
/// - JSON body serialization
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    user_agent: String,
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    pub fn new(base_url: Url, user_agent: impl Into<String>, auth_manager: Arc<dyn AuthManager>) -> Self {
        Self {
            base_url,
            user_agent: user_agent.into(),
            auth_manager,
        }
    }

    /// Builds a complete URL for `path` with the given query pairs.
    ///
    /// The base URL's own path is kept, so `http://host/api/v1` plus
    /// `/sdk/search` yields `http://host/api/v1/sdk/search`.
    pub fn build_url(&self, path: &str, query: &[(&str, &str)]) -> MemicResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Builds an authenticated HTTP request.
    pub fn build_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> MemicResult<HttpRequest> {
        let url = self.build_url(path, query)?;

        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers.insert("Accept".to_string(), mime::APPLICATION_JSON.to_string());

        if let Some((key, value)) = self.auth_manager.get_auth_header() {
            headers.insert(key, value);
        }

        let body = match body {
            Some(body) => {
                headers.insert("Content-Type".to_string(), mime::APPLICATION_JSON.to_string());
                Some(Bytes::from(serde_json::to_vec(body)?))
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
            timeout: None,
        })
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
