//! Configuration types for the Memic API client.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use crate::error::{ConfigurationError, MemicError};

/// Default Memic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://app.memic.ai";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Presigned transfers get this multiple of the request timeout.
pub const UPLOAD_TIMEOUT_MULTIPLIER: u32 = 10;

/// Default interval between file status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default maximum wait for a file to become ready.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MEMIC_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "MEMIC_BASE_URL";

/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "MEMIC_TIMEOUT_SECS";

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

/// Configuration for the Memic client.
///
/// Set once when the client is built and shared read-only afterwards.
#[derive(Clone)]
pub struct MemicConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API. May carry a path prefix.
    pub base_url: Url,
    /// Timeout for control-plane requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Timeout for the presigned file transfer.
    pub upload_timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Log level.
    pub log_level: LogLevel,
}

impl MemicConfig {
    /// Create a new configuration builder.
    pub fn builder() -> MemicConfigBuilder {
        MemicConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `MEMIC_API_KEY` (required), `MEMIC_BASE_URL` and `MEMIC_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, MemicError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = std::env::var(BASE_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::builder()
            .api_key(SecretString::new(api_key))
            .base_url(&base_url)?
            .timeout(Duration::from_secs(timeout_secs))
            .build()
    }
}

impl std::fmt::Debug for MemicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemicConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Builder for MemicConfig.
#[derive(Default)]
pub struct MemicConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
    user_agent: Option<String>,
    log_level: Option<LogLevel>,
}

impl MemicConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL. A trailing slash is ignored.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, MemicError> {
        let trimmed = base_url.trim_end_matches('/');
        let url = Url::parse(trimmed)?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidBaseUrl {
                url: base_url.to_string(),
            }
            .into());
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the presigned transfer timeout.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<MemicConfig, MemicError> {
        let api_key = self.api_key
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let timeout = self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(MemicConfig {
            api_key,
            base_url,
            timeout,
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            upload_timeout: self.upload_timeout.unwrap_or(timeout * UPLOAD_TIMEOUT_MULTIPLIER),
            user_agent: self.user_agent
                .unwrap_or_else(|| format!("memic-rust/{}", env!("CARGO_PKG_VERSION"))),
            log_level: self.log_level.unwrap_or_default(),
        })
    }
}
