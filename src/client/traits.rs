//! Client trait definition for the Memic API.

use async_trait::async_trait;
use std::path::Path;

use crate::error::MemicResult;
use crate::services::{FilesService, ProjectsService, SearchService};
use crate::types::{
    ApiKeyContext, File, PollConfig, Project, SearchOptions, SearchResults, UploadOptions,
};

/// Main client for the Memic API.
///
/// The accessors expose the individual services; the provided methods are
/// shortcuts over them. Every call is a fresh remote read and calls may run
/// concurrently on one client.
#[async_trait]
pub trait MemicClient: Send + Sync {
    /// Access the projects service.
    fn projects(&self) -> &dyn ProjectsService;

    /// Access the files service.
    fn files(&self) -> &dyn FilesService;

    /// Access the search service.
    fn search_service(&self) -> &dyn SearchService;

    /// List the projects visible to the API key.
    async fn list_projects(&self) -> MemicResult<Vec<Project>> {
        self.projects().list().await
    }

    /// Organization, project and environment of the API key.
    async fn context(&self) -> MemicResult<ApiKeyContext> {
        self.projects().context().await
    }

    /// Upload a local file into `project_id`.
    async fn upload_file(&self, project_id: &str, path: &Path, options: UploadOptions) -> MemicResult<File> {
        self.files().upload(project_id, path, options).await
    }

    /// Perform one file status check.
    async fn get_file_status(&self, project_id: &str, file_id: &str) -> MemicResult<File> {
        self.files().get_status(project_id, file_id).await
    }

    /// Poll until the file is ready, fails, or `poll.timeout` passes.
    async fn wait_for_ready(&self, project_id: &str, file_id: &str, poll: PollConfig) -> MemicResult<File> {
        self.files().wait_for_ready(project_id, file_id, poll).await
    }

    /// Delete a file.
    async fn delete_file(&self, project_id: &str, file_id: &str) -> MemicResult<()> {
        self.files().delete(project_id, file_id).await
    }

    /// Search documents and structured sources.
    async fn search(&self, query: &str, options: SearchOptions) -> MemicResult<SearchResults> {
        self.search_service().search(query, options).await
    }
}
