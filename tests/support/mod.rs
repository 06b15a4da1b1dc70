//! Shared test doubles

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sudan_stats::fetcher::{Transport, TransportResponse};
use sudan_stats::query::QueryExecutor;
use sudan_stats::ResponseCache;

/// Transport answering from a URL -> response script
///
/// Unscripted URLs answer 404. Every requested URL is recorded in order.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, TransportResponse>>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `url` with a 200 and `body`
    pub fn ok(&self, url: &str, body: impl Into<String>) -> &Self {
        self.respond(url, TransportResponse::ok(body))
    }

    /// Answer `url` with an arbitrary response
    pub fn respond(&self, url: &str, response: TransportResponse) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of times `url` was requested
    pub fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> TransportResponse {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| TransportResponse::status(404))
    }
}

/// Executor over `transport` with a fresh cache
#[allow(dead_code)]
pub fn executor(transport: &Arc<ScriptedTransport>) -> QueryExecutor {
    QueryExecutor::with_transport(transport.clone(), Arc::new(ResponseCache::new()))
}
