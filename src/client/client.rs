//! Main client implementation for the Memic API.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::MemicConfig;
use crate::error::MemicError;
use crate::observability::{Logger, Tracer};
use crate::services::{
    FilesService, FilesServiceImpl, ProjectsService, ProjectsServiceImpl, SearchService,
    SearchServiceImpl,
};
use crate::transport::HttpTransport;

use super::builder::MemicClientBuilder;
use super::traits::MemicClient;

/// Implementation of the Memic API client.
///
/// Services are created on first access and share one transport and one
/// immutable configuration.
///
/// # Example
///
/// ```no_run
/// use integrations_memic::{MemicClient, MemicClientImpl};
/// use integrations_memic::types::SearchOptions;
/// use secrecy::SecretString;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MemicClientImpl::builder()
///     .api_key(SecretString::new("mk_...".into()))
///     .build()?;
///
/// let results = client.search("key findings", SearchOptions::new().top_k(5)).await?;
/// for hit in &results {
///     println!("[{:.2}] {}", hit.score, hit.file_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MemicClientImpl {
    config: Arc<MemicConfig>,
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,

    // Lazy-initialized services
    projects_service: OnceCell<ProjectsServiceImpl>,
    files_service: OnceCell<FilesServiceImpl>,
    search_service: OnceCell<SearchServiceImpl>,

    // Observability
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl MemicClientImpl {
    /// Creates a new client builder.
    pub fn builder() -> MemicClientBuilder {
        MemicClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `MEMIC_API_KEY` (required), `MEMIC_BASE_URL` and
    /// `MEMIC_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, MemicError> {
        Self::new(MemicConfig::from_env()?)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: MemicConfig) -> Result<Self, MemicError> {
        MemicClientBuilder::from_config(config).build()
    }

    /// Creates a client from pre-constructed parts (used by builder).
    pub(super) fn from_parts(
        config: MemicConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        logger: Arc<dyn Logger>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            auth_manager,
            projects_service: OnceCell::new(),
            files_service: OnceCell::new(),
            search_service: OnceCell::new(),
            logger,
            tracer,
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &MemicConfig {
        &self.config
    }
}

impl MemicClient for MemicClientImpl {
    fn projects(&self) -> &dyn ProjectsService {
        self.projects_service.get_or_init(|| {
            ProjectsServiceImpl::new(
                Arc::clone(&self.config),
                Arc::clone(&self.transport),
                Arc::clone(&self.auth_manager),
            )
            .with_observability(Arc::clone(&self.logger), Arc::clone(&self.tracer))
        })
    }

    fn files(&self) -> &dyn FilesService {
        self.files_service.get_or_init(|| {
            FilesServiceImpl::new(
                Arc::clone(&self.config),
                Arc::clone(&self.transport),
                Arc::clone(&self.auth_manager),
            )
            .with_observability(Arc::clone(&self.logger), Arc::clone(&self.tracer))
        })
    }

    fn search_service(&self) -> &dyn SearchService {
        self.search_service.get_or_init(|| {
            SearchServiceImpl::new(
                Arc::clone(&self.config),
                Arc::clone(&self.transport),
                Arc::clone(&self.auth_manager),
            )
            .with_observability(Arc::clone(&self.logger), Arc::clone(&self.tracer))
        })
    }
}

impl std::fmt::Debug for MemicClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemicClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Create a client from configuration.
pub fn create_client(config: MemicConfig) -> Result<Arc<dyn MemicClient>, MemicError> {
    let client = MemicClientImpl::new(config)?;
    Ok(Arc::new(client))
}

/// Create a client from environment variables.
pub fn create_client_from_env() -> Result<Arc<dyn MemicClient>, MemicError> {
    create_client(MemicConfig::from_env()?)
}
