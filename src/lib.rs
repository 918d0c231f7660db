//! # Memic API Client
//!
//! Rust client for the Memic document ingestion and search API.
//!
//! ## Features
//!
//! - Presigned three-step file upload with optional wait-for-ready polling
//! - Semantic and structured search with typed metadata filters
//! - One result type for both wire shapes the service has used
//! - Typed error taxonomy separating transport, HTTP and processing failures
//! - Structured logging and spans through the `tracing` crate
//! - Secure credential handling with `SecretString`
//! - Mock transport for testing without a server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_memic::{create_client_from_env, MemicClient};
//! use integrations_memic::types::{MetadataFilters, PageRange, SearchOptions, UploadOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads MEMIC_API_KEY (and optionally MEMIC_BASE_URL)
//!     let client = create_client_from_env()?;
//!
//!     let projects = client.list_projects().await?;
//!     let project_id = &projects[0].id;
//!
//!     let file = client
//!         .upload_file(project_id, Path::new("report.pdf"), UploadOptions::new().reference_id("lesson_123"))
//!         .await?;
//!     println!("{} is {}", file.id, file.status);
//!
//!     let results = client
//!         .search(
//!             "key findings",
//!             SearchOptions::new()
//!                 .project_id(project_id.clone())
//!                 .filters(MetadataFilters::new().page_range(PageRange::between(1, 50))),
//!         )
//!         .await?;
//!     for hit in &results {
//!         println!("[{:.2}] {}: {}", hit.score, hit.file_name, hit.content);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Main client interface and factory functions
//! - `config` - Configuration types and builder
//! - `auth` - API key header management
//! - `transport` - HTTP transport layer
//! - `error` - Error types and status classification
//! - `types` - Files, projects, filters and search types
//! - `services` - Service implementations (projects, files, search)
//! - `observability` - Logging and tracing

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Development/testing modules - always available for integration tests
pub mod mocks;
pub mod fixtures;

// Re-exports for convenience
pub use auth::{ApiKeyAuthManager, AuthManager};
pub use client::{create_client, create_client_from_env, MemicClient, MemicClientBuilder, MemicClientImpl};
pub use config::{
    LogLevel, MemicConfig, MemicConfigBuilder, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    // Main error types
    MemicError,
    MemicResult,
    // Error categories
    ApiError,
    AuthenticationError,
    ConfigurationError,
    NetworkError,
    ProcessingError,
    RequestError,
    ResourceError,
    ResponseError,
    ValidationDetail,
    // Error mapping utilities
    classify_response,
    extract_error_message,
    map_http_status,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBuilder, ResponseParser,
    TransportError,
};

// Type re-exports
pub use types::{
    // Project types
    ApiKeyContext, Project,
    // File types
    File, FileStatus, PollConfig, UploadOptions,
    // Filter types
    MetadataFilters, PageRange,
    // Search types
    ColumnInfo, ResultsContainer, RoutingInfo, SearchOptions, SearchResult, SearchResults,
    SearchRoute, StructuredResult,
};

// Service re-exports
pub use services::{FilesService, ProjectsService, SearchService};

// Observability re-exports
pub use observability::{
    // Logging
    Logger, StructuredLogger, DefaultLogger,
    // Tracing
    Tracer, Span, SpanStatus, TracingTracer, TracingSpan, DefaultTracer,
    // Factory functions
    create_default_stack, create_noop_stack,
};
