//! Projects service for the Memic API.

mod service;

use async_trait::async_trait;

use crate::error::MemicResult;
use crate::types::{ApiKeyContext, Project};

pub use service::ProjectsServiceImpl;

/// Service for projects and API key context.
#[async_trait]
pub trait ProjectsService: Send + Sync {
    /// List the projects visible to the API key.
    async fn list(&self) -> MemicResult<Vec<Project>>;

    /// Organization, project and environment the API key is scoped to.
    async fn context(&self) -> MemicResult<ApiKeyContext>;
}
