//! Cache-or-fetch discipline shared by every provider

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::fetcher::{FetcherError, FetcherResult, Transport};
use crate::{metrics, ProviderId};

/// Transport paired with the session's response cache
///
/// Cloning is cheap; both halves are shared.
#[derive(Clone)]
pub struct CachedFetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
}

impl std::fmt::Debug for CachedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFetcher")
            .field("cache_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl CachedFetcher {
    /// Create a fetcher over `transport` backed by `cache`
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    /// The shared response cache
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Return the body for `url`, from the cache when possible
    ///
    /// On a miss the transport is called; a 200 response without transport
    /// error is stored before returning. Empty bodies are returned but never
    /// cached.
    ///
    /// # Errors
    /// `NetworkError` when the transport failed, `HttpError` for non-200 status.
    pub async fn fetch(&self, provider: ProviderId, url: &str) -> FetcherResult<String> {
        if let Some(body) = self.cache.get(url) {
            metrics::record_cache_hit(provider);
            debug!(provider = %provider, "Cache hit: {}", url);
            return Ok(body);
        }
        metrics::record_cache_miss(provider);

        let started = Instant::now();
        let response = self.transport.get(url).await;
        let status = response.error.is_none().then_some(response.status);
        metrics::record_http_request(provider, status, started.elapsed());

        if let Some(error) = response.error {
            return Err(FetcherError::NetworkError(error));
        }
        if response.status != 200 {
            return Err(FetcherError::HttpError(response.status));
        }

        debug!(
            provider = %provider,
            bytes = response.body.len(),
            "Fetched {}",
            url
        );

        if !response.body.is_empty() {
            self.cache.put(url, response.body.clone());
        }
        Ok(response.body)
    }
}
