//! # Sudan Stats Library
//!
//! Fetches statistical indicators for Sudan and its neighbors from five public
//! providers and normalizes every provider's response shape into flat,
//! presence-aware rows.
//!
//! ## Features
//!
//! - **Five Providers**: World Bank, WHO Global Health Observatory, FAOSTAT,
//!   UNHCR population statistics and ILOSTAT (SDMX-JSON)
//! - **Response Cache**: URL-keyed bodies reused for five minutes within a session
//! - **Pagination**: page-count envelopes and SDMX key-pattern probing
//! - **Year Filters**: encoded into each provider's native query syntax
//! - **Tolerant Decoding**: missing or mistyped fields become absent cells, never errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sudan_stats::query::{IndicatorQuery, QueryExecutor};
//! use sudan_stats::{ResponseCache, YearFilter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(ResponseCache::new());
//! let executor = QueryExecutor::new(cache);
//!
//! let query = IndicatorQuery::new("SP.POP.TOTL")?
//!     .with_countries(["SD", "EGY"])
//!     .with_years(YearFilter::between(2010, 2020));
//!
//! let mut results = executor.worldbank(&query).await;
//! while let Some(batch) = results.next_batch(2048) {
//!     for row in batch {
//!         println!("{} {} {:?}", row.year, row.country.as_deref().unwrap_or(""), row.value);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`cache`] - TTL-bounded response cache shared by every query
//! - [`filter`] - Year-range filter and its per-provider query encodings
//! - [`registry`] - Embedded provider and country reference data
//! - [`fetcher`] - Transport boundary, pagination strategies and provider decoders
//! - [`query`] - Validated query parameters, executor and batch iteration
//! - [`output`] - CSV and JSON writers for any result set
//!
//! ## Row Types
//!
//! - [`WorldBankRow`], [`WhoRow`], [`FaoRow`], [`UnhcrRow`], [`IloRow`] - observations
//! - [`WbIndicatorInfo`], [`WhoIndicatorInfo`] - indicator catalogs
//! - [`SearchResult`] - cross-provider indicator search hits

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response cache
pub mod cache;

/// CLI command implementations
pub mod cli;

/// Transport, pagination and provider decoders
pub mod fetcher;

/// Year filter encoders
pub mod filter;

/// Cache, request and row counters
pub mod metrics;

/// Result set writers
pub mod output;

/// Query validation and execution
pub mod query;

/// Provider and country reference data
pub mod registry;

pub use cache::ResponseCache;
pub use filter::YearFilter;

/// One of the five supported statistical providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// World Bank open data (World Development Indicators)
    WorldBank,
    /// WHO Global Health Observatory
    Who,
    /// FAO FAOSTAT
    Fao,
    /// UNHCR population statistics
    Unhcr,
    /// International Labour Organization (ILOSTAT SDMX)
    Ilo,
}

impl ProviderId {
    /// All providers in display order
    pub const ALL: [ProviderId; 5] = [
        ProviderId::WorldBank,
        ProviderId::Who,
        ProviderId::Fao,
        ProviderId::Unhcr,
        ProviderId::Ilo,
    ];

    /// Stable lowercase identifier used in URLs, metrics labels and output
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WorldBank => "worldbank",
            ProviderId::Who => "who",
            ProviderId::Fao => "fao",
            ProviderId::Unhcr => "unhcr",
            ProviderId::Ilo => "ilo",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "worldbank" | "wb" => Ok(ProviderId::WorldBank),
            "who" => Ok(ProviderId::Who),
            "fao" => Ok(ProviderId::Fao),
            "unhcr" => Ok(ProviderId::Unhcr),
            "ilo" => Ok(ProviderId::Ilo),
            _ => Err(format!("Invalid provider: {s}")),
        }
    }
}

/// A single output cell: a present scalar or an explicit null
///
/// Absence is distinct from zero and from the empty string and survives
/// through every writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Absent value
    Null,
    /// UTF-8 text
    Text(String),
    /// 32-bit integer (years)
    Int32(i32),
    /// 64-bit integer (population counts)
    Int64(i64),
    /// Double precision measurement
    Double(f64),
}

impl Scalar {
    /// True for [`Scalar::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Int32(v) => write!(f, "{v}"),
            Scalar::Int64(v) => write!(f, "{v}"),
            Scalar::Double(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

impl From<&Option<String>> for Scalar {
    fn from(value: &Option<String>) -> Self {
        value.as_ref().map_or(Scalar::Null, Scalar::from)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int32(value)
    }
}

impl From<Option<f64>> for Scalar {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Scalar::Null, Scalar::Double)
    }
}

impl From<Option<i64>> for Scalar {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Scalar::Null, Scalar::Int64)
    }
}

/// A row that can be presented as a fixed list of named columns
pub trait TabularRow {
    /// Column names, in output order
    const COLUMNS: &'static [&'static str];

    /// Cell values, one per entry of [`TabularRow::COLUMNS`]
    fn values(&self) -> Vec<Scalar>;
}

/// World Bank indicator observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldBankRow {
    /// Indicator code (`indicator.id`)
    pub indicator_id: Option<String>,
    /// Indicator label (`indicator.value`)
    pub indicator_name: Option<String>,
    /// Country code as reported by the API (ISO2)
    pub country: Option<String>,
    /// Country label
    pub country_name: Option<String>,
    /// Observation year, 0 when unparseable
    pub year: i32,
    /// Observed value
    pub value: Option<f64>,
}

impl WorldBankRow {
    /// True when the observation carried a numeric value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl TabularRow for WorldBankRow {
    const COLUMNS: &'static [&'static str] = &[
        "indicator_id",
        "indicator_name",
        "country",
        "country_name",
        "year",
        "value",
    ];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.indicator_id).into(),
            (&self.indicator_name).into(),
            (&self.country).into(),
            (&self.country_name).into(),
            self.year.into(),
            self.value.into(),
        ]
    }
}

/// WHO GHO indicator observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhoRow {
    /// Indicator code, from the response or the query
    pub indicator_code: String,
    /// Indicator label (GHO data responses never carry one)
    pub indicator_name: Option<String>,
    /// Country code (`SpatialDim`), from the response or the query
    pub country: String,
    /// Observation year (`TimeDim`), 0 when unparseable
    pub year: i32,
    /// Sex breakdown (`Dim1`)
    pub sex: Option<String>,
    /// Observed value (`NumericValue`)
    pub value: Option<f64>,
    /// WHO region (`ParentLocation`)
    pub region: Option<String>,
}

impl WhoRow {
    /// True when the observation carried a numeric value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl TabularRow for WhoRow {
    const COLUMNS: &'static [&'static str] = &[
        "indicator_code",
        "indicator_name",
        "country",
        "year",
        "sex",
        "value",
        "region",
    ];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.indicator_code).into(),
            (&self.indicator_name).into(),
            (&self.country).into(),
            self.year.into(),
            (&self.sex).into(),
            self.value.into(),
            (&self.region).into(),
        ]
    }
}

/// FAOSTAT observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaoRow {
    /// Dataset domain code (e.g. `QCL`)
    pub dataset: String,
    /// Area label
    pub area: Option<String>,
    /// Item label
    pub item: Option<String>,
    /// Element label
    pub element: Option<String>,
    /// Observation year, 0 when unparseable
    pub year: i32,
    /// Observed value
    pub value: Option<f64>,
    /// Unit of measure
    pub unit: Option<String>,
}

impl FaoRow {
    /// True when the observation carried a numeric value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl TabularRow for FaoRow {
    const COLUMNS: &'static [&'static str] =
        &["dataset", "area", "item", "element", "year", "value", "unit"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.dataset).into(),
            (&self.area).into(),
            (&self.item).into(),
            (&self.element).into(),
            self.year.into(),
            self.value.into(),
            (&self.unit).into(),
        ]
    }
}

/// UNHCR population record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnhcrRow {
    /// Reference year, 0 when missing
    pub year: i32,
    /// Population type as requested by the caller
    pub population_type: String,
    /// Country of origin code
    pub country_origin: Option<String>,
    /// Country of origin label
    pub country_origin_name: Option<String>,
    /// Country of asylum code
    pub country_asylum: Option<String>,
    /// Country of asylum label
    pub country_asylum_name: Option<String>,
    /// Head count
    pub value: Option<i64>,
}

impl UnhcrRow {
    /// True when the record carried a head count
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl TabularRow for UnhcrRow {
    const COLUMNS: &'static [&'static str] = &[
        "year",
        "population_type",
        "country_origin",
        "country_origin_name",
        "country_asylum",
        "country_asylum_name",
        "value",
    ];

    fn values(&self) -> Vec<Scalar> {
        vec![
            self.year.into(),
            (&self.population_type).into(),
            (&self.country_origin).into(),
            (&self.country_origin_name).into(),
            (&self.country_asylum).into(),
            (&self.country_asylum_name).into(),
            self.value.into(),
        ]
    }
}

/// ILOSTAT observation decoded from SDMX-JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IloRow {
    /// Indicator as requested (without the `DF_` prefix added for the request)
    pub indicator: String,
    /// ISO3 country code the request was made for
    pub country: String,
    /// `SEX` dimension value
    pub sex: Option<String>,
    /// `AGE` dimension value, or `CLASSIF1` when the dataflow has no age breakdown
    pub classif1: Option<String>,
    /// `TIME_PERIOD` year, 0 when unparseable
    pub year: i32,
    /// Observed value
    pub value: Option<f64>,
}

impl IloRow {
    /// True when the observation carried a numeric value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl TabularRow for IloRow {
    const COLUMNS: &'static [&'static str] =
        &["indicator", "country", "sex", "classif1", "year", "value"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.indicator).into(),
            (&self.country).into(),
            (&self.sex).into(),
            (&self.classif1).into(),
            self.year.into(),
            self.value.into(),
        ]
    }
}

/// World Bank indicator catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WbIndicatorInfo {
    /// Indicator code
    pub indicator_id: Option<String>,
    /// Indicator label
    pub indicator_name: Option<String>,
    /// Source database label
    pub source: Option<String>,
    /// Long description
    pub source_note: Option<String>,
}

impl TabularRow for WbIndicatorInfo {
    const COLUMNS: &'static [&'static str] =
        &["indicator_id", "indicator_name", "source", "source_note"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.indicator_id).into(),
            (&self.indicator_name).into(),
            (&self.source).into(),
            (&self.source_note).into(),
        ]
    }
}

/// WHO GHO indicator catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhoIndicatorInfo {
    /// Indicator code
    pub indicator_code: Option<String>,
    /// Indicator label
    pub indicator_name: Option<String>,
    /// Language of the label
    pub language: Option<String>,
}

impl TabularRow for WhoIndicatorInfo {
    const COLUMNS: &'static [&'static str] = &["indicator_code", "indicator_name", "language"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.indicator_code).into(),
            (&self.indicator_name).into(),
            (&self.language).into(),
        ]
    }
}

/// Indicator search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Provider the indicator belongs to
    pub provider: ProviderId,
    /// Indicator code
    pub indicator_id: String,
    /// Indicator label
    pub indicator_name: String,
}

impl TabularRow for SearchResult {
    const COLUMNS: &'static [&'static str] = &["provider", "indicator_id", "indicator_name"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            self.provider.as_str().into(),
            (&self.indicator_id).into(),
            (&self.indicator_name).into(),
        ]
    }
}
