//! WHO Global Health Observatory data
//!
//! GHO speaks OData: one request per country, filtered server-side with
//! `$filter=SpatialDim eq '{ISO3}'`, answered with `{ "value": [...] }`.

use serde_json::Value;

use crate::fetcher::json::{non_empty_string_field, number_field, parse_body, year_field};
use crate::fetcher::{FetcherError, FetcherResult, PageMeta, ProviderPipeline, RequestPlan};
use crate::filter::{who_time_clause, YearFilter};
use crate::{ProviderId, WhoRow};

/// GHO OData API base URL
pub const WHO_BASE_URL: &str = "https://ghoapi.azureedge.net/api/";

/// Items array of an OData `{ "value": [...] }` envelope
///
/// # Errors
/// `InvalidResponse` when `value` is missing or not an array.
pub fn odata_items(root: &Value) -> FetcherResult<&Vec<Value>> {
    root.get("value")
        .and_then(Value::as_array)
        .ok_or_else(|| FetcherError::InvalidResponse("missing OData value array".to_string()))
}

/// Decode one country's response
///
/// `indicator` and `country` are used when an item lacks `IndicatorCode`
/// or `SpatialDim`.
pub fn decode_page(
    body: &str,
    indicator: &str,
    country: &str,
    rows: &mut Vec<WhoRow>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let items = odata_items(&root)?;

    rows.extend(items.iter().map(|item| WhoRow {
        indicator_code: non_empty_string_field(item, "IndicatorCode")
            .unwrap_or_else(|| indicator.to_string()),
        indicator_name: None,
        country: non_empty_string_field(item, "SpatialDim").unwrap_or_else(|| country.to_string()),
        year: year_field(item, "TimeDim"),
        sex: non_empty_string_field(item, "Dim1"),
        value: number_field(item, "NumericValue"),
        region: non_empty_string_field(item, "ParentLocation"),
    }));

    Ok(PageMeta::default())
}

/// Build the OData query URL for one country
///
/// The year range is ANDed into the same `$filter` expression, since OData
/// accepts a single `$filter` parameter.
pub fn data_url(base_url: &str, indicator: &str, country: &str, years: &YearFilter) -> String {
    let mut url = format!("{base_url}{indicator}?$filter=SpatialDim eq '{country}'");
    let time = who_time_clause(years);
    if !time.is_empty() {
        url.push_str(" and ");
        url.push_str(&time);
    }
    url
}

/// WHO observations for one indicator across countries
#[derive(Debug, Clone)]
pub struct WhoPipeline {
    indicator: String,
    countries: Vec<String>,
    years: YearFilter,
    base_url: String,
}

impl WhoPipeline {
    /// Create a pipeline; `countries` must already be normalized ISO3 codes
    pub fn new(indicator: impl Into<String>, countries: Vec<String>, years: YearFilter) -> Self {
        Self {
            indicator: indicator.into(),
            countries,
            years,
            base_url: WHO_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ProviderPipeline for WhoPipeline {
    type Row = WhoRow;

    fn plans(&self) -> Vec<RequestPlan> {
        self.countries
            .iter()
            .map(|country| {
                RequestPlan::single(
                    ProviderId::Who,
                    country.clone(),
                    data_url(&self.base_url, &self.indicator, country, &self.years),
                )
            })
            .collect()
    }

    fn decode_page(
        &self,
        body: &str,
        plan: &RequestPlan,
        rows: &mut Vec<WhoRow>,
    ) -> FetcherResult<PageMeta> {
        decode_page(body, &self.indicator, &plan.scope, rows)
    }
}
