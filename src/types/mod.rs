//! Core types for the Memic API.
//!
//! This module contains the request, response, and option types needed to
//! interact with the Memic API.

// Module declarations
pub mod common;
pub mod files;
pub mod filters;
pub mod projects;
pub mod search;

// Re-exports for file types
pub use files::{
    ConfirmUploadRequest, File, FileStatus, InitUploadRequest, InitUploadResponse, PollConfig,
    UploadOptions,
};

// Re-exports for filter types
pub use filters::{MetadataFilters, PageRange};

// Re-exports for project types
pub use projects::{ApiKeyContext, Project};

// Re-exports for search types
pub use search::{
    ColumnInfo, ResultsContainer, RoutingInfo, SearchOptions, SearchRequest, SearchResult,
    SearchResults, SearchRoute, StructuredResult, DEFAULT_MIN_SCORE, DEFAULT_TOP_K,
};
