//! Builder for creating Memic client instances.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::{LogLevel, MemicConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::error::{ConfigurationError, MemicError, NetworkError};
use crate::observability::{create_default_stack, Logger, Tracer};
use crate::transport::{HttpTransport, ReqwestTransport};

use super::client::MemicClientImpl;

/// Builder for creating a `MemicClientImpl`.
///
/// The API key comes from [`api_key`](Self::api_key), else `MEMIC_API_KEY`.
/// The base URL comes from [`base_url`](Self::base_url), else
/// `MEMIC_BASE_URL`, else `https://app.memic.ai`.
///
/// # Example
///
/// ```no_run
/// use integrations_memic::MemicClientBuilder;
/// use secrecy::SecretString;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MemicClientBuilder::new()
///     .api_key(SecretString::new("mk_...".into()))
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct MemicClientBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
    user_agent: Option<String>,
    log_level: Option<LogLevel>,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Option<Arc<dyn Logger>>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl MemicClientBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: None,
            connect_timeout: None,
            upload_timeout: None,
            user_agent: None,
            log_level: None,
            transport: None,
            logger: None,
            tracer: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: MemicConfig) -> Self {
        Self {
            api_key: Some(config.api_key),
            base_url: Some(config.base_url.to_string()),
            timeout: Some(config.timeout),
            connect_timeout: Some(config.connect_timeout),
            upload_timeout: Some(config.upload_timeout),
            user_agent: Some(config.user_agent),
            log_level: Some(config.log_level),
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the base URL. It may carry a path prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Sets the timeout for presigned file transfers.
    pub fn upload_timeout(mut self, duration: Duration) -> Self {
        self.upload_timeout = Some(duration);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the minimum log level of the default logger.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets a custom HTTP transport (for testing).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets a custom tracer.
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no API key is given and `MEMIC_API_KEY` is unset or empty
    /// - the base URL is not an http(s) URL
    /// - the HTTP transport cannot be created
    pub fn build(self) -> Result<MemicClientImpl, MemicError> {
        self.build_with_env(|name| std::env::var(name).ok())
    }

    fn build_with_env<F>(self, env: F) -> Result<MemicClientImpl, MemicError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = self
            .api_key
            .or_else(|| {
                env(API_KEY_ENV)
                    .filter(|key| !key.is_empty())
                    .map(SecretString::new)
            })
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = self
            .base_url
            .or_else(|| env(BASE_URL_ENV).filter(|url| !url.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = MemicConfig::builder()
            .api_key(api_key)
            .base_url(&base_url)?;
        if let Some(timeout) = self.timeout {
            config = config.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.connect_timeout(timeout);
        }
        if let Some(timeout) = self.upload_timeout {
            config = config.upload_timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.user_agent(user_agent);
        }
        if let Some(level) = self.log_level {
            config = config.log_level(level);
        }
        let config = config.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(config.timeout, config.connect_timeout).map_err(|e| {
                    NetworkError::ConnectionFailed {
                        message: format!("Failed to create HTTP transport: {}", e),
                    }
                })?,
            ),
        };

        let auth_manager: Arc<dyn AuthManager> = Arc::new(ApiKeyAuthManager::from_config(&config));

        let (default_logger, default_tracer) = create_default_stack("memic", config.log_level);
        let logger = self.logger.unwrap_or(default_logger);
        let tracer = self.tracer.unwrap_or(default_tracer);

        logger.debug(
            "Memic client initialized",
            serde_json::json!({
                "base_url": config.base_url.as_str(),
                "timeout_ms": config.timeout.as_millis() as u64,
                "upload_timeout_ms": config.upload_timeout.as_millis() as u64,
            }),
        );

        Ok(MemicClientImpl::from_parts(
            config,
            transport,
            auth_manager,
            logger,
            tracer,
        ))
    }
}

impl Default for MemicClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
