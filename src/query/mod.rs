//! Query validation and execution
//!
//! A query is built in two steps:
//!
//! 1. **Validation**: [`job::IndicatorQuery`] and its siblings reject empty
//!    required parameters and normalize the country list up front
//! 2. **Execution**: [`executor::QueryExecutor`] runs the matching provider
//!    pipeline and hands back a [`results::QueryResultSet`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sudan_stats::query::{FaoQuery, QueryExecutor};
//! use sudan_stats::ResponseCache;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = QueryExecutor::new(Arc::new(ResponseCache::new()));
//! let query = FaoQuery::new("QCL", "Production")?.with_countries(["SDN", "SSD"]);
//!
//! let results = executor.fao(&query).await;
//! println!("{} rows", results.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Only caller mistakes surface as [`QueryError`]. Transport and decoding
//! failures are absorbed by the pipeline: they are logged and show up as a
//! smaller result set.

pub mod executor;
pub mod job;
pub mod results;

pub use executor::QueryExecutor;
pub use job::{FaoQuery, IndicatorQuery, SearchQuery, UnhcrQuery};
pub use results::QueryResultSet;

use crate::registry::RegistryError;

/// Default batch size handed to the presentation layer
pub const DEFAULT_BATCH_SIZE: usize = 2048;

/// Query errors
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Indicator code is empty
    #[error("indicator cannot be empty")]
    EmptyIndicator,

    /// FAOSTAT dataset code is empty
    #[error("dataset cannot be empty")]
    EmptyDataset,

    /// FAOSTAT element name is empty
    #[error("element cannot be empty")]
    EmptyElement,

    /// UNHCR population type is empty
    #[error("population type cannot be empty")]
    EmptyPopulationType,

    /// Search query is empty
    #[error("search query cannot be empty")]
    EmptySearchQuery,

    /// Provider id is not one of the supported providers
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Transport could not be configured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Embedded reference data is unavailable
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
