//! Transport boundary, pagination strategies and provider decoders
//!
//! Every provider is described by a [`ProviderPipeline`]: the requests it
//! needs ([`RequestPlan`]s, one per country or catalog) and a pure page
//! decoder. [`pagination::run_pipeline`] drives any pipeline through the
//! shared [`client::CachedFetcher`].

use crate::ProviderId;
use async_trait::async_trait;

pub mod catalog;
pub mod client;
pub mod fao;
pub mod ilo;
pub mod json;
pub mod pagination;
pub mod sdmx;
pub mod search;
pub mod shared_resources;
pub mod transport;
pub mod unhcr;
pub mod who;
pub mod worldbank;

pub use client::CachedFetcher;
pub use transport::{FetchConfig, HttpTransport};

/// Fetcher errors
///
/// These never cross the query boundary: pagination absorbs them, logs a
/// warning and keeps whatever rows were already decoded.
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Upstream answered with a non-200 status
    #[error("HTTP error: status {0}")]
    HttpError(u16),

    /// Transport failed before a response arrived
    #[error("network error: {0}")]
    NetworkError(String),

    /// Body is not valid JSON
    #[error("parse error: {0}")]
    ParseError(String),

    /// Valid JSON but not the expected envelope shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Raw outcome of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code, 0 when no response arrived
    pub status: u16,
    /// Response body
    pub body: String,
    /// Transport-level failure description
    pub error: Option<String>,
}

impl TransportResponse {
    /// 200 response with a body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            error: None,
        }
    }

    /// Response with the given status and an empty body
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            error: None,
        }
    }

    /// Transport failure with no response
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: String::new(),
            error: Some(error.into()),
        }
    }

    /// Status 200 and no transport error
    pub fn is_success(&self) -> bool {
        self.status == 200 && self.error.is_none()
    }
}

/// Network GET boundary
///
/// Implementations never return `Err`; failures are described in the
/// [`TransportResponse`] so callers apply one success rule everywhere.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET request for `url`
    async fn get(&self, url: &str) -> TransportResponse;
}

/// How the requests of one plan are issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStrategy {
    /// Metadata-driven pages: URL is `prefix + page + suffix`, page starting at 1
    Paged {
        /// URL up to and including `page=`
        prefix: String,
        /// Remainder appended after the page number (may be empty)
        suffix: String,
    },
    /// Candidate URLs tried in order until one yields a non-empty body
    Probe {
        /// Candidate URLs
        candidates: Vec<String>,
    },
    /// Every URL requested once; a failure skips only that URL
    Each {
        /// URLs in request order
        urls: Vec<String>,
    },
}

/// Requests needed for one country (or one catalog)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    /// Provider the requests go to
    pub provider: ProviderId,
    /// Country ISO3 code, or a catalog label
    pub scope: String,
    /// Request strategy
    pub strategy: RequestStrategy,
}

impl RequestPlan {
    /// Plan with a single request
    pub fn single(provider: ProviderId, scope: impl Into<String>, url: String) -> Self {
        Self {
            provider,
            scope: scope.into(),
            strategy: RequestStrategy::Each { urls: vec![url] },
        }
    }
}

/// Pagination metadata extracted from a decoded page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Total page count declared by the envelope
    pub total_pages: Option<u32>,
}

/// One provider's request construction and page decoding
pub trait ProviderPipeline: Send + Sync {
    /// Normalized row type produced by this provider
    type Row: Send;

    /// Requests to issue, in order
    fn plans(&self) -> Vec<RequestPlan>;

    /// Decode one page body, appending rows
    ///
    /// # Errors
    /// Returns an error when the body is not JSON or not the expected
    /// envelope. Rows are only appended when decoding succeeds.
    fn decode_page(
        &self,
        body: &str,
        plan: &RequestPlan,
        rows: &mut Vec<Self::Row>,
    ) -> FetcherResult<PageMeta>;
}
