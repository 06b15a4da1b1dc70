//! Shared HTTP client for all provider requests
//!
//! One `reqwest::Client` is built per process for the default
//! [`FetchConfig`] so connection pools are reused across queries. Custom
//! configurations get their own client from [`build_http_client`].

use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Arc;

use crate::fetcher::transport::FetchConfig;
use crate::fetcher::{FetcherError, FetcherResult};

/// Global HTTP client built from `FetchConfig::default()`
///
/// Configured with explicit timeouts to prevent indefinite hangs:
/// - Connect timeout: 10 seconds
/// - Request timeout: 90 seconds
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(
        build_http_client(&FetchConfig::default()).unwrap_or_else(|e| {
            panic!("FATAL: {}. Check system TLS configuration.", e);
        }),
    )
});

/// Get the global HTTP client
///
/// Returns a clone of the Arc, which is cheap (just increments ref count)
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}

/// Build a client for a specific configuration
pub fn build_http_client(config: &FetchConfig) -> FetcherResult<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .gzip(true)
        .build()
        .map_err(|e| FetcherError::ConfigError(format!("Failed to build HTTP client: {e}")))
}
