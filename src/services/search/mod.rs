//! Search service for the Memic API.

mod request;
mod response;
mod service;

use async_trait::async_trait;

use crate::error::MemicResult;
use crate::types::{SearchOptions, SearchResults};

pub use request::build_search_request;
pub use response::parse_search_response;
pub use service::SearchServiceImpl;

/// Service for semantic and structured search.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Run a search. Invalid input fails before any remote call.
    async fn search(&self, query: &str, options: SearchOptions) -> MemicResult<SearchResults>;
}
