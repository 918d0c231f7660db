//! Integration tests for the upload flow and wait-for-ready polling.

use integrations_memic::fixtures::load_fixture;
use integrations_memic::mocks::MockHttpTransport;
use integrations_memic::transport::{HttpMethod, TransportError};
use integrations_memic::types::{FileStatus, PollConfig, UploadOptions};
use integrations_memic::{
    MemicClient, MemicClientImpl, MemicError, NetworkError, ProcessingError, RequestError,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const FILE_ID: &str = "7f3c2a90-1b4e-4d2f-9a61-0c8e5d1b2a77";

/// Helper to create a client over a mock transport.
fn create_test_client(transport: Arc<MockHttpTransport>) -> MemicClientImpl {
    MemicClientImpl::builder()
        .api_key(SecretString::new("mk_test".into()))
        .base_url("http://localhost:8000")
        .timeout(Duration::from_secs(30))
        .transport(transport)
        .build()
        .unwrap()
}

/// Helper to write a small PDF-named file.
fn local_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, b"hello world").unwrap();
    (dir, path)
}

fn enqueue_upload_steps(transport: &MockHttpTransport) {
    transport.enqueue_json_response(200, &load_fixture("files/init_response.json"));
    transport.enqueue_empty_response(200);
    transport.enqueue_json_response(200, &load_fixture("files/confirm_response.json"));
}

fn quick_poll(options: UploadOptions) -> UploadOptions {
    options
        .poll_interval(Duration::from_secs(1))
        .poll_timeout(Duration::from_secs(3))
}

#[tokio::test]
async fn test_upload_without_waiting_makes_three_calls() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload_steps(&transport);
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let file = client
        .upload_file(
            "proj-1",
            &path,
            UploadOptions::new().wait_for_ready(false).reference_id("lesson_123"),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(file.id, FILE_ID);
    assert_eq!(file.status, FileStatus::Uploaded);
    transport.verify_request_count(3);
    transport.verify_request(0, HttpMethod::Post, "http://localhost:8000/sdk/files/init");
    transport.verify_request(1, HttpMethod::Put, "https://storage.example.com/uploads/7f3c2a90");
    transport.verify_request(2, HttpMethod::Post, &format!("/sdk/files/{}/confirm", FILE_ID));

    assert_eq!(
        transport.request_json(0),
        serde_json::json!({
            "project_id": "proj-1",
            "filename": "report.pdf",
            "size": 11,
            "mime_type": "application/pdf",
            "reference_id": "lesson_123"
        })
    );
    assert_eq!(transport.request_json(2), serde_json::json!({"project_id": "proj-1"}));
}

#[tokio::test]
async fn test_transfer_uses_presigned_url_without_api_key() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload_steps(&transport);
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    client
        .upload_file("proj-1", &path, UploadOptions::new().wait_for_ready(false))
        .await
        .unwrap();

    // Assert
    let requests = transport.get_requests();
    let put = &requests[1];
    assert!(!put.headers.contains_key("X-API-Key"));
    assert_eq!(put.headers.get("Content-Type").map(String::as_str), Some("application/pdf"));
    assert_eq!(put.body.as_deref(), Some(&b"hello world"[..]));
    assert_eq!(put.timeout, Some(Duration::from_secs(300)));

    transport.verify_header(0, "X-API-Key", "mk_test");
    transport.verify_header(2, "X-API-Key", "mk_test");
}

#[tokio::test(start_paused = true)]
async fn test_upload_waits_until_ready() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload_steps(&transport);
    transport.enqueue_file_status(FILE_ID, "parsing_started");
    transport.enqueue_file_status(FILE_ID, "embedding_started");
    transport.enqueue_json_response(200, &load_fixture("files/status_ready.json"));
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();
    let start = tokio::time::Instant::now();

    // Act
    let file = client
        .upload_file("proj-1", &path, quick_poll(UploadOptions::new()))
        .await
        .unwrap();

    // Assert
    assert_eq!(file.status, FileStatus::Ready);
    assert_eq!(file.total_chunks, 42);
    transport.verify_request_count(6);
    for index in 3..6 {
        transport.verify_request(
            index,
            HttpMethod::Get,
            &format!("/sdk/files/{}/status?project_id=proj-1", FILE_ID),
        );
    }
    assert!(start.elapsed() <= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_ready_times_out() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    for _ in 0..5 {
        transport.enqueue_file_status(FILE_ID, "chunking_started");
    }
    let client = create_test_client(transport.clone());

    // Act
    let err = client
        .wait_for_ready(
            "proj-1",
            FILE_ID,
            PollConfig::new(Duration::from_secs(1), Duration::from_secs(2)),
        )
        .await
        .unwrap_err();

    // Assert
    transport.verify_request_count(2);
    assert!(err.is_retryable());
    assert_eq!(err.last_status(), Some(FileStatus::ChunkingStarted));
    assert!(matches!(
        err,
        MemicError::Processing(ProcessingError::PollTimeout { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_processing_failure_carries_message() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    enqueue_upload_steps(&transport);
    transport.enqueue_file_status(FILE_ID, "conversion_complete");
    transport.enqueue_json_response(200, &load_fixture("files/status_failed.json"));
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let err = client
        .upload_file("proj-1", &path, quick_poll(UploadOptions::new()))
        .await
        .unwrap_err();

    // Assert
    transport.verify_request_count(5);
    match err {
        MemicError::Processing(ProcessingError::Failed { file_id, status, message }) => {
            assert_eq!(file_id, FILE_ID);
            assert_eq!(status, FileStatus::ParsingFailed);
            assert_eq!(message.as_deref(), Some("Document is password protected"));
        }
        other => panic!("Expected processing failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_local_file_makes_no_calls() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let client = create_test_client(transport.clone());
    let dir = tempfile::tempdir().unwrap();

    // Act
    let err = client
        .upload_file("proj-1", &dir.path().join("missing.pdf"), UploadOptions::new())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, MemicError::Request(RequestError::LocalFile { .. })));
    assert!(err.to_string().contains("missing.pdf"));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_invalid_poll_options_make_no_calls() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let zero_interval = client
        .upload_file("proj-1", &path, UploadOptions::new().poll_interval(Duration::ZERO))
        .await
        .unwrap_err();
    let short_timeout = client
        .upload_file(
            "proj-1",
            &path,
            UploadOptions::new()
                .poll_interval(Duration::from_secs(5))
                .poll_timeout(Duration::from_secs(1)),
        )
        .await
        .unwrap_err();

    // Assert
    assert!(zero_interval.is_validation());
    assert!(short_timeout.is_validation());
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_initiate_failure_stops_upload() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(404, r#"{"detail": "Project not found"}"#);
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let err = client
        .upload_file("proj-missing", &path, UploadOptions::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "Not found: Project not found");
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_storage_rejection_stops_before_confirm() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &load_fixture("files/init_response.json"));
    transport.enqueue_json_response(403, "<Error><Code>SignatureDoesNotMatch</Code></Error>");
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let err = client
        .upload_file("proj-1", &path, UploadOptions::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status_code(), Some(403));
    assert!(matches!(err, MemicError::Authentication(_)));
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_confirm_transport_failure_is_network_error() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &load_fixture("files/init_response.json"));
    transport.enqueue_empty_response(200);
    transport.enqueue_error(TransportError::Timeout);
    let client = create_test_client(transport.clone());
    let (_dir, path) = local_file();

    // Act
    let err = client
        .upload_file("proj-1", &path, UploadOptions::new())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, MemicError::Network(NetworkError::Timeout)));
    transport.verify_request_count(3);
}

#[tokio::test(start_paused = true)]
async fn test_status_check_error_aborts_wait() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_file_status(FILE_ID, "uploaded");
    transport.enqueue_json_response(500, r#"{"message": "database unavailable"}"#);
    transport.enqueue_file_status(FILE_ID, "ready");
    let client = create_test_client(transport.clone());

    // Act
    let err = client
        .wait_for_ready("proj-1", FILE_ID, PollConfig::new(Duration::from_secs(1), Duration::from_secs(10)))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("database unavailable"));
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_get_file_status_unknown_status_is_response_error() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_file_status(FILE_ID, "teleporting");
    let client = create_test_client(transport.clone());

    // Act
    let err = client.get_file_status("proj-1", FILE_ID).await.unwrap_err();

    // Assert
    assert!(matches!(err, MemicError::Response(_)));
}

#[tokio::test]
async fn test_delete_file() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_empty_response(204);
    let client = create_test_client(transport.clone());

    // Act
    client.delete_file("proj-1", FILE_ID).await.unwrap();

    // Assert
    transport.verify_request(0, HttpMethod::Delete, &format!("/sdk/files/{}?project_id=proj-1", FILE_ID));
}
