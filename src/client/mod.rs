//! Client interface and factory for the Memic API.
//!
//! Provides the main `MemicClientImpl` with builder pattern,
//! lazy-initialized services, and factory functions for client creation.

mod builder;
mod client;
mod traits;

// Re-export public API
pub use builder::MemicClientBuilder;
pub use client::{create_client, create_client_from_env, MemicClientImpl};
pub use traits::MemicClient;
