//! World Bank indicator data
//!
//! The v2 API answers with a two-element array `[meta, data]`. `meta.pages`
//! drives pagination; `data` holds one object per observation (or `null`
//! when the query matched nothing).

use serde_json::Value;

use crate::fetcher::json::{nested_string_field, number_field, parse_body, year_field};
use crate::fetcher::{
    FetcherError, FetcherResult, PageMeta, ProviderPipeline, RequestPlan, RequestStrategy,
};
use crate::filter::{append_fragment, encode_worldbank, YearFilter};
use crate::{ProviderId, WorldBankRow};

/// World Bank API base URL
pub const WORLDBANK_BASE_URL: &str = "https://api.worldbank.org/v2/";

/// Page size requested from the API
pub const PER_PAGE: u32 = 1000;

/// Split a `[meta, data]` envelope
///
/// # Errors
/// `InvalidResponse` unless the root is an array of at least two elements.
pub fn split_envelope(root: &Value) -> FetcherResult<(&Value, &Value)> {
    match root.as_array() {
        Some(items) if items.len() >= 2 => Ok((&items[0], &items[1])),
        _ => Err(FetcherError::InvalidResponse(
            "expected [metadata, data] array".to_string(),
        )),
    }
}

/// Page count from the envelope metadata (`meta.pages`, integer only)
pub fn page_meta(meta: &Value) -> PageMeta {
    PageMeta {
        total_pages: meta
            .get("pages")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok()),
    }
}

/// Decode one observation page
pub fn decode_page(body: &str, rows: &mut Vec<WorldBankRow>) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let (meta, data) = split_envelope(&root)?;

    if let Some(items) = data.as_array() {
        rows.extend(items.iter().map(decode_observation));
    }

    Ok(page_meta(meta))
}

fn decode_observation(item: &Value) -> WorldBankRow {
    WorldBankRow {
        indicator_id: nested_string_field(item, "indicator", "id"),
        indicator_name: nested_string_field(item, "indicator", "value"),
        country: nested_string_field(item, "country", "id"),
        country_name: nested_string_field(item, "country", "value"),
        year: year_field(item, "date"),
        value: number_field(item, "value"),
    }
}

/// World Bank observations for one indicator across countries
#[derive(Debug, Clone)]
pub struct WorldBankPipeline {
    indicator: String,
    countries: Vec<String>,
    years: YearFilter,
    base_url: String,
}

impl WorldBankPipeline {
    /// Create a pipeline; `countries` must already be normalized ISO3 codes
    pub fn new(indicator: impl Into<String>, countries: Vec<String>, years: YearFilter) -> Self {
        Self {
            indicator: indicator.into(),
            countries,
            years,
            base_url: WORLDBANK_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Page URL prefix for one country (ends with `page=`)
    fn page_prefix(&self, country: &str) -> String {
        format!(
            "{}country/{}/indicator/{}?format=json&per_page={}&page=",
            self.base_url, country, self.indicator, PER_PAGE
        )
    }
}

impl ProviderPipeline for WorldBankPipeline {
    type Row = WorldBankRow;

    fn plans(&self) -> Vec<RequestPlan> {
        let mut suffix = String::new();
        append_fragment(&mut suffix, &encode_worldbank(&self.years));

        self.countries
            .iter()
            .map(|country| RequestPlan {
                provider: ProviderId::WorldBank,
                scope: country.clone(),
                strategy: RequestStrategy::Paged {
                    prefix: self.page_prefix(country),
                    suffix: suffix.clone(),
                },
            })
            .collect()
    }

    fn decode_page(
        &self,
        body: &str,
        _plan: &RequestPlan,
        rows: &mut Vec<WorldBankRow>,
    ) -> FetcherResult<PageMeta> {
        decode_page(body, rows)
    }
}
