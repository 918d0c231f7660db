//! File-related types for the Memic API.
//!
//! This module contains the file record, its processing status and the
//! request/response shapes of the presigned upload protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
use super::common;

/// Processing status of an uploaded file.
///
/// The pipeline moves forward through upload, conversion, parsing, chunking
/// and embedding. Every `*Failed` value and `Ready` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Transfer to storage in progress.
    Uploading,
    /// Transfer confirmed, waiting for the pipeline.
    Uploaded,
    /// Transfer failed.
    UploadFailed,
    /// Format conversion started.
    ConversionStarted,
    /// Format conversion finished.
    ConversionComplete,
    /// Format conversion failed.
    ConversionFailed,
    /// Parsing started.
    ParsingStarted,
    /// Parsing finished.
    ParsingComplete,
    /// Parsing failed.
    ParsingFailed,
    /// Chunking started.
    ChunkingStarted,
    /// Chunking finished.
    ChunkingComplete,
    /// Chunking failed.
    ChunkingFailed,
    /// Embedding started.
    EmbeddingStarted,
    /// Embedding finished.
    EmbeddingComplete,
    /// Embedding failed.
    EmbeddingFailed,
    /// Fully processed and searchable.
    Ready,
}

impl FileStatus {
    /// Every status, in pipeline order.
    pub const ALL: [FileStatus; 16] = [
        FileStatus::Uploading,
        FileStatus::Uploaded,
        FileStatus::UploadFailed,
        FileStatus::ConversionStarted,
        FileStatus::ConversionComplete,
        FileStatus::ConversionFailed,
        FileStatus::ParsingStarted,
        FileStatus::ParsingComplete,
        FileStatus::ParsingFailed,
        FileStatus::ChunkingStarted,
        FileStatus::ChunkingComplete,
        FileStatus::ChunkingFailed,
        FileStatus::EmbeddingStarted,
        FileStatus::EmbeddingComplete,
        FileStatus::EmbeddingFailed,
        FileStatus::Ready,
    ];

    /// Wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Uploading => "uploading",
            FileStatus::Uploaded => "uploaded",
            FileStatus::UploadFailed => "upload_failed",
            FileStatus::ConversionStarted => "conversion_started",
            FileStatus::ConversionComplete => "conversion_complete",
            FileStatus::ConversionFailed => "conversion_failed",
            FileStatus::ParsingStarted => "parsing_started",
            FileStatus::ParsingComplete => "parsing_complete",
            FileStatus::ParsingFailed => "parsing_failed",
            FileStatus::ChunkingStarted => "chunking_started",
            FileStatus::ChunkingComplete => "chunking_complete",
            FileStatus::ChunkingFailed => "chunking_failed",
            FileStatus::EmbeddingStarted => "embedding_started",
            FileStatus::EmbeddingComplete => "embedding_complete",
            FileStatus::EmbeddingFailed => "embedding_failed",
            FileStatus::Ready => "ready",
        }
    }

    /// True for any `*_failed` status.
    pub fn is_failed(self) -> bool {
        matches!(
            self,
            FileStatus::UploadFailed
                | FileStatus::ConversionFailed
                | FileStatus::ParsingFailed
                | FileStatus::ChunkingFailed
                | FileStatus::EmbeddingFailed
        )
    }

    /// True when the file is neither failed nor ready.
    pub fn is_processing(self) -> bool {
        !self.is_failed() && !self.is_ready()
    }

    /// True for the terminal success status.
    pub fn is_ready(self) -> bool {
        self == FileStatus::Ready
    }

    /// True once no further transitions will happen.
    pub fn is_terminal(self) -> bool {
        !self.is_processing()
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown file status: {}", s))
    }
}

/// A file stored in a Memic project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    /// File identifier.
    #[serde(deserialize_with = "common::id")]
    pub id: String,
    /// Owning project.
    #[serde(default, deserialize_with = "common::id_or_default")]
    pub project_id: String,
    /// Current processing status.
    pub status: FileStatus,
    /// Stored name.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub name: String,
    /// Name of the file as uploaded.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub original_filename: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub size: u64,
    /// MIME type.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub mime_type: String,
    /// Caller-supplied correlation key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Failure description when the status is a `*_failed` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Caller-supplied metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Number of chunks produced.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub total_chunks: u64,
    /// Number of embeddings produced.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub total_embeddings: u64,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of the upload initiation call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InitUploadRequest {
    /// Target project.
    pub project_id: String,
    /// File name (no directories).
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type of the content.
    pub mime_type: String,
    /// Caller-supplied correlation key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Caller-supplied metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Presigned target returned by the upload initiation call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InitUploadResponse {
    /// Provisional file identifier.
    #[serde(deserialize_with = "common::id")]
    pub file_id: String,
    /// Presigned URL receiving the bytes.
    pub upload_url: String,
    /// Seconds until the presigned URL expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Body of the upload confirmation call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfirmUploadRequest {
    /// Target project.
    pub project_id: String,
}

/// Interval and deadline of a wait-for-ready loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between status checks. Must be non-zero.
    pub interval: Duration,
    /// Maximum total wait. Must be at least `interval`.
    pub timeout: Duration,
}

impl PollConfig {
    /// Creates a poll configuration.
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Options for `upload_file`.
///
/// # Example
///
/// ```
/// use integrations_memic::types::UploadOptions;
/// use std::time::Duration;
///
/// let options = UploadOptions::new()
///     .reference_id("lesson_123")
///     .poll_interval(Duration::from_secs(1))
///     .poll_timeout(Duration::from_secs(120));
/// assert!(options.wait_for_ready);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    /// Poll until the file is ready (default: true).
    pub wait_for_ready: bool,
    /// Caller-supplied correlation key.
    pub reference_id: Option<String>,
    /// Caller-supplied metadata.
    pub metadata: Option<Map<String, Value>>,
    /// Polling parameters used when `wait_for_ready` is set.
    pub poll: PollConfig,
}

impl UploadOptions {
    /// Default options: wait for ready, poll every 2s for up to 300s.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to wait for processing to finish.
    pub fn wait_for_ready(mut self, wait: bool) -> Self {
        self.wait_for_ready = wait;
        self
    }

    /// Set the correlation key.
    pub fn reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Set the metadata map.
    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the pause between status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    /// Set the maximum wait.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll.timeout = timeout;
        self
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            wait_for_ready: true,
            reference_id: None,
            metadata: None,
            poll: PollConfig::default(),
        }
    }
}
