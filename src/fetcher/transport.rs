//! reqwest-backed [`Transport`]

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::fetcher::shared_resources::{build_http_client, global_http_client};
use crate::fetcher::{FetcherResult, Transport, TransportResponse};

/// HTTP connect timeout - time to establish the TCP connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP request timeout - statistical APIs can be slow on large pages
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("sudan-stats/", env!("CARGO_PKG_VERSION"));

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Overall request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Set the overall request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Transport performing real HTTP GETs
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::shared()
    }
}

impl HttpTransport {
    /// Transport over the process-wide client (default configuration)
    pub fn shared() -> Self {
        Self {
            client: global_http_client(),
        }
    }

    /// Transport for a specific configuration
    ///
    /// Reuses the global client when `config` is the default one.
    pub fn new(config: &FetchConfig) -> FetcherResult<Self> {
        if *config == FetchConfig::default() {
            return Ok(Self::shared());
        }
        Ok(Self {
            client: Arc::new(build_http_client(config)?),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> TransportResponse {
        debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return TransportResponse::failed(e.to_string()),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => TransportResponse {
                status,
                body,
                error: None,
            },
            Err(e) => TransportResponse {
                status,
                body: String::new(),
                error: Some(format!("Failed to read body: {e}")),
            },
        }
    }
}
