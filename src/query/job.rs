//! Validated query parameters
//!
//! Fields are private so every query passes through its constructor;
//! deserialization is routed through the same checks.

use serde::{Deserialize, Serialize};

use super::{QueryError, QueryResult};
use crate::filter::YearFilter;
use crate::registry::normalize_countries;

/// Trim a required parameter, rejecting blank input
fn required(value: impl Into<String>, error: QueryError) -> QueryResult<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

fn default_countries() -> Vec<String> {
    normalize_countries(std::iter::empty::<&str>())
}

/// Indicator query for World Bank, WHO and ILO
///
/// Countries default to Sudan; codes are normalized to ISO3 when known and
/// passed through otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorQuery")]
pub struct IndicatorQuery {
    indicator: String,
    countries: Vec<String>,
    years: YearFilter,
}

#[derive(Deserialize)]
struct RawIndicatorQuery {
    indicator: String,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    years: YearFilter,
}

impl TryFrom<RawIndicatorQuery> for IndicatorQuery {
    type Error = QueryError;

    fn try_from(raw: RawIndicatorQuery) -> QueryResult<Self> {
        Ok(Self::new(raw.indicator)?
            .with_countries(raw.countries)
            .with_years(raw.years))
    }
}

impl IndicatorQuery {
    /// Create a query for `indicator`
    ///
    /// # Errors
    /// [`QueryError::EmptyIndicator`] when the indicator is blank.
    pub fn new(indicator: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            indicator: required(indicator, QueryError::EmptyIndicator)?,
            countries: default_countries(),
            years: YearFilter::none(),
        })
    }

    /// Replace the country list (ISO2 or ISO3, any case)
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countries = normalize_countries(countries);
        self
    }

    /// Restrict to a year range
    pub fn with_years(mut self, years: YearFilter) -> Self {
        self.years = years;
        self
    }

    /// Provider indicator code
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// Normalized country codes, in request order
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Inclusive year range
    pub fn years(&self) -> YearFilter {
        self.years
    }
}

/// FAOSTAT query: dataset code plus element name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFaoQuery")]
pub struct FaoQuery {
    dataset: String,
    element: String,
    countries: Vec<String>,
    years: YearFilter,
}

#[derive(Deserialize)]
struct RawFaoQuery {
    dataset: String,
    element: String,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    years: YearFilter,
}

impl TryFrom<RawFaoQuery> for FaoQuery {
    type Error = QueryError;

    fn try_from(raw: RawFaoQuery) -> QueryResult<Self> {
        Ok(Self::new(raw.dataset, raw.element)?
            .with_countries(raw.countries)
            .with_years(raw.years))
    }
}

impl FaoQuery {
    /// Create a query
    ///
    /// # Errors
    /// [`QueryError::EmptyDataset`] or [`QueryError::EmptyElement`] for blank input.
    pub fn new(dataset: impl Into<String>, element: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            dataset: required(dataset, QueryError::EmptyDataset)?,
            element: required(element, QueryError::EmptyElement)?,
            countries: default_countries(),
            years: YearFilter::none(),
        })
    }

    /// Replace the country list
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countries = normalize_countries(countries);
        self
    }

    /// Restrict to a year range
    pub fn with_years(mut self, years: YearFilter) -> Self {
        self.years = years;
        self
    }

    /// Dataset code (e.g. `QCL`)
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Element name, matched as a case-insensitive substring
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Normalized country codes
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Inclusive year range
    pub fn years(&self) -> YearFilter {
        self.years
    }
}

/// UNHCR query for one population type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUnhcrQuery")]
pub struct UnhcrQuery {
    population_type: String,
    countries: Vec<String>,
    years: YearFilter,
}

#[derive(Deserialize)]
struct RawUnhcrQuery {
    population_type: String,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    years: YearFilter,
}

impl TryFrom<RawUnhcrQuery> for UnhcrQuery {
    type Error = QueryError;

    fn try_from(raw: RawUnhcrQuery) -> QueryResult<Self> {
        Ok(Self::new(raw.population_type)?
            .with_countries(raw.countries)
            .with_years(raw.years))
    }
}

impl UnhcrQuery {
    /// Create a query
    ///
    /// # Errors
    /// [`QueryError::EmptyPopulationType`] when the type is blank.
    pub fn new(population_type: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            population_type: required(population_type, QueryError::EmptyPopulationType)?,
            countries: default_countries(),
            years: YearFilter::none(),
        })
    }

    /// Replace the country list
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countries = normalize_countries(countries);
        self
    }

    /// Restrict to a year range
    pub fn with_years(mut self, years: YearFilter) -> Self {
        self.years = years;
        self
    }

    /// Population type as given (`refugees`, `idp`, `asylum`, ...)
    pub fn population_type(&self) -> &str {
        &self.population_type
    }

    /// Normalized country codes
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Inclusive year range
    pub fn years(&self) -> YearFilter {
        self.years
    }
}

/// Cross-provider indicator search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchQuery")]
pub struct SearchQuery {
    query: String,
}

#[derive(Deserialize)]
struct RawSearchQuery {
    query: String,
}

impl TryFrom<RawSearchQuery> for SearchQuery {
    type Error = QueryError;

    fn try_from(raw: RawSearchQuery) -> QueryResult<Self> {
        Self::new(raw.query)
    }
}

impl SearchQuery {
    /// Create a search
    ///
    /// # Errors
    /// [`QueryError::EmptySearchQuery`] when the text is blank.
    pub fn new(query: impl Into<String>) -> QueryResult<Self> {
        Ok(Self {
            query: required(query, QueryError::EmptySearchQuery)?,
        })
    }

    /// Search text
    pub fn query(&self) -> &str {
        &self.query
    }
}
