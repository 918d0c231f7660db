//! Mock implementations for testing.
//!
//! This module provides mock implementations of transport and authentication
//! components for testing the Memic API client in isolation.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::auth::{AuthManager, API_KEY_HEADER};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were enqueued and every request
/// is recorded for later verification.
///
/// # Example
///
/// ```
/// use integrations_memic::mocks::MockHttpTransport;
/// use integrations_memic::transport::{HttpTransport, HttpRequest, HttpMethod};
/// use std::collections::HashMap;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"status": "ok"}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Get,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
///     timeout: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
            headers,
        }));
    }

    /// Enqueue a JSON file-status response with the given status value.
    pub fn enqueue_file_status(&self, file_id: &str, status: &str) {
        let body = serde_json::json!({
            "id": file_id,
            "project_id": "proj-1",
            "name": "doc.pdf",
            "original_filename": "doc.pdf",
            "size": 11,
            "mime_type": "application/pdf",
            "status": status,
        });
        self.enqueue_json_response(200, &body.to_string());
    }

    /// Enqueue a response with an empty body, as storage targets send.
    pub fn enqueue_empty_response(&self, status: u16) {
        self.enqueue_response(Ok(HttpResponse {
            status,
            body: Bytes::new(),
            headers: HashMap::new(),
        }));
    }

    /// Enqueue a transport failure.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = self.request_count();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request carries a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].headers.get(header_name);
        assert_eq!(
            actual_value,
            Some(&header_value.to_string()),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }

    /// Parses the JSON body of the request at `index`.
    pub fn request_json(&self, index: usize) -> serde_json::Value {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let body = requests[index]
            .body
            .as_ref()
            .unwrap_or_else(|| panic!("Request {} has no body", index));
        serde_json::from_slice(body).unwrap()
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Connection(
                    "No response configured in MockHttpTransport".to_string(),
                ))
            })
    }
}

/// Mock authentication manager for testing.
///
/// # Example
///
/// ```
/// use integrations_memic::mocks::MockAuthManager;
/// use integrations_memic::auth::AuthManager;
///
/// let auth = MockAuthManager::new("mk_test");
/// let header = auth.get_auth_header();
/// assert_eq!(header, Some(("X-API-Key".to_string(), "mk_test".to_string())));
/// ```
#[derive(Clone)]
pub struct MockAuthManager {
    api_key: Option<String>,
}

impl MockAuthManager {
    /// Create a mock auth manager sending `api_key`.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
        }
    }

    /// Create a mock auth manager that sends no credentials.
    pub fn anonymous() -> Self {
        Self { api_key: None }
    }
}

impl AuthManager for MockAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        self.api_key
            .as_ref()
            .map(|key| (API_KEY_HEADER.to_string(), key.clone()))
    }
}
