//! In-memory response cache shared by every query in a session
//!
//! Bodies are keyed by the exact request URL and expire after a fixed TTL.
//! Expired entries are never swept in the background; they are evicted the
//! next time a lookup finds them stale.
//!
//! Timestamps come from [`tokio::time::Instant`], so tests running on a
//! paused runtime can move the clock with `tokio::time::advance`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live for cached responses (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    stored_at: Instant,
}

/// Thread-safe URL -> body cache with lazy TTL expiry
///
/// A single mutex guards every operation. The lock is never held across an
/// `.await`, so the cache can be shared freely between tasks and threads.
///
/// # Examples
///
/// ```
/// use sudan_stats::cache::ResponseCache;
///
/// let cache = ResponseCache::new();
/// cache.put("https://example.org/a", "{}");
/// assert_eq!(cache.get("https://example.org/a").as_deref(), Some("{}"));
/// assert_eq!(cache.get("https://example.org/b"), None);
/// ```
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    /// Create an empty cache with the default 300 second TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    /// Create an empty cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached body for `url` if present and not expired
    ///
    /// An expired entry is removed as a side effect of the lookup.
    pub fn get(&self, url: &str) -> Option<String> {
        let mut entries = self.lock();
        let now = Instant::now();

        let expired = match entries.get(url) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.stored_at) > self.ttl,
        };

        if expired {
            debug!("Evicting expired cache entry for {}", url);
            entries.remove(url);
            return None;
        }

        entries.get(url).map(|entry| entry.body.clone())
    }

    /// Insert or overwrite the entry for `url`, stamped with the current time
    pub fn put(&self, url: impl Into<String>, body: impl Into<String>) {
        let entry = CacheEntry {
            body: body.into(),
            stored_at: Instant::now(),
        };
        self.lock().insert(url.into(), entry);
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of physically stored entries, including stale ones not yet evicted
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
