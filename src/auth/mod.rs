//! Authentication module for the Memic API.

use crate::config::MemicConfig;
use secrecy::{ExposeSecret, SecretString};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authentication manager for the Memic API.
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    fn get_auth_header(&self) -> Option<(String, String)>;
}

/// API key authentication manager.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Create from config.
    pub fn from_config(config: &MemicConfig) -> Self {
        Self::new(config.api_key.clone())
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        Some((
            API_KEY_HEADER.to_string(),
            self.api_key.expose_secret().to_string(),
        ))
    }
}

impl std::fmt::Debug for ApiKeyAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthManager")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
