//! Files service for the Memic API.
//!
//! Uploads go through three sequential calls: initiate (presigned target),
//! transfer (bytes to storage), confirm (start processing). Waiting for the
//! processing pipeline is a separate loop over status checks.

mod polling;
mod service;
mod validation;

use async_trait::async_trait;
use std::path::Path;

use crate::error::MemicResult;
use crate::types::{File, PollConfig, UploadOptions};

pub use polling::{poll_until_ready, PollState};
pub use service::FilesServiceImpl;
pub use validation::{
    inspect_local_file, validate_identifier, validate_poll_config, LocalFile, DEFAULT_MIME_TYPE,
};

/// Service for file upload and processing status.
#[async_trait]
pub trait FilesService: Send + Sync {
    /// Upload a local file into a project.
    ///
    /// With `options.wait_for_ready` set, the call returns once the file is
    /// ready, failed, or the poll timeout passed.
    async fn upload(&self, project_id: &str, path: &Path, options: UploadOptions) -> MemicResult<File>;

    /// Perform one status check.
    async fn get_status(&self, project_id: &str, file_id: &str) -> MemicResult<File>;

    /// Poll until the file is ready, fails, or the timeout passes.
    async fn wait_for_ready(&self, project_id: &str, file_id: &str, poll: PollConfig) -> MemicResult<File>;

    /// Delete a file.
    async fn delete(&self, project_id: &str, file_id: &str) -> MemicResult<()>;
}
