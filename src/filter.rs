//! Year-range filter and its per-provider query encodings
//!
//! Each provider spells an inclusive year range differently. The encoders
//! here are pure: they return an empty string when no bound is set, so the
//! caller can append the fragment unconditionally with [`append_fragment`].

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Lower bound substituted when a closed range is required but only the end is set
pub const OPEN_RANGE_START: i32 = 1900;

/// Upper bound substituted when a closed range is required but only the start is set
pub const OPEN_RANGE_END: i32 = 2100;

/// Optional inclusive year range applied to every request of a query
///
/// Non-positive years are treated as unset.
///
/// # Examples
///
/// ```
/// use sudan_stats::filter::{encode_worldbank, YearFilter};
///
/// assert_eq!(encode_worldbank(&YearFilter::none()), "");
/// assert_eq!(encode_worldbank(&YearFilter::between(2010, 2020)), "date=2010:2020");
/// assert_eq!(encode_worldbank(&YearFilter::from_year(2015)), "date=2015:2100");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawYearFilter")]
pub struct YearFilter {
    start: Option<i32>,
    end: Option<i32>,
}

#[derive(Deserialize)]
struct RawYearFilter {
    #[serde(default)]
    start: Option<i32>,
    #[serde(default)]
    end: Option<i32>,
}

impl From<RawYearFilter> for YearFilter {
    fn from(raw: RawYearFilter) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl YearFilter {
    /// No year restriction
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from optional bounds, discarding non-positive years
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self {
            start: start.filter(|y| *y > 0),
            end: end.filter(|y| *y > 0),
        }
    }

    /// Inclusive range `[start, end]`
    pub fn between(start: i32, end: i32) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Every year from `start` onwards
    pub fn from_year(start: i32) -> Self {
        Self::new(Some(start), None)
    }

    /// Every year up to and including `end`
    pub fn until(end: i32) -> Self {
        Self::new(None, Some(end))
    }

    /// True when at least one bound is set
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Lower bound
    pub fn start(&self) -> Option<i32> {
        self.start
    }

    /// Upper bound
    pub fn end(&self) -> Option<i32> {
        self.end
    }
}

/// World Bank `date=START:END`; a missing bound becomes 1900 or 2100
pub fn encode_worldbank(filter: &YearFilter) -> String {
    match (filter.start, filter.end) {
        (None, None) => String::new(),
        (start, end) => format!(
            "date={}:{}",
            start.unwrap_or(OPEN_RANGE_START),
            end.unwrap_or(OPEN_RANGE_END)
        ),
    }
}

/// Bare OData expression over `TimeDim`, without the `$filter=` key
///
/// Used to AND the year range into an existing `$filter` clause.
pub fn who_time_clause(filter: &YearFilter) -> String {
    let mut clauses = Vec::with_capacity(2);
    if let Some(start) = filter.start {
        clauses.push(format!("TimeDim ge {start}"));
    }
    if let Some(end) = filter.end {
        clauses.push(format!("TimeDim le {end}"));
    }
    clauses.join(" and ")
}

/// WHO GHO `$filter=TimeDim ge START and TimeDim le END`
pub fn encode_who(filter: &YearFilter) -> String {
    if !filter.is_active() {
        return String::new();
    }
    format!("$filter={}", who_time_clause(filter))
}

/// FAOSTAT `year_start=START&year_end=END`
pub fn encode_fao(filter: &YearFilter) -> String {
    encode_pair(filter, "year_start", "year_end")
}

/// UNHCR `yearFrom=START&yearTo=END`
pub fn encode_unhcr(filter: &YearFilter) -> String {
    encode_pair(filter, "yearFrom", "yearTo")
}

/// ILOSTAT SDMX `startPeriod=START&endPeriod=END`
pub fn encode_ilo(filter: &YearFilter) -> String {
    encode_pair(filter, "startPeriod", "endPeriod")
}

// Open-ended bounds are simply omitted.
fn encode_pair(filter: &YearFilter, start_key: &str, end_key: &str) -> String {
    let mut out = String::new();
    if let Some(start) = filter.start {
        let _ = write!(out, "{start_key}={start}");
    }
    if let Some(end) = filter.end {
        if !out.is_empty() {
            out.push('&');
        }
        let _ = write!(out, "{end_key}={end}");
    }
    out
}

/// Append `fragment` to a URL that already has a query string
pub fn append_fragment(url: &mut String, fragment: &str) {
    if !fragment.is_empty() {
        url.push('&');
        url.push_str(fragment);
    }
}
