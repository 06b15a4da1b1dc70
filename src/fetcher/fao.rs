//! FAOSTAT data
//!
//! FAOSTAT addresses countries by its own numeric area codes and returns
//! `{ "data": [...] }` with one object per (item, element, year). Rows are
//! kept when their `Element` contains the requested element name,
//! case-insensitively.

use serde_json::Value;

use crate::fetcher::json::{
    lenient_number_field, non_empty_string_field, parse_body, str_field, string_field, year_field,
};
use crate::fetcher::{FetcherError, FetcherResult, PageMeta, ProviderPipeline, RequestPlan};
use crate::filter::{append_fragment, encode_fao, YearFilter};
use crate::registry::fao_area_code;
use crate::{FaoRow, ProviderId};

/// FAOSTAT API base URL
pub const FAO_BASE_URL: &str = "https://fenixservices.fao.org/faostat/api/v1/";

/// Decode one response, keeping rows whose element matches `element`
///
/// Items without a string `Element` are kept.
pub fn decode_page(
    body: &str,
    dataset: &str,
    element: &str,
    rows: &mut Vec<FaoRow>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let items = root
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| FetcherError::InvalidResponse("missing data array".to_string()))?;

    let needle = element.to_lowercase();

    for item in items {
        if let Some(name) = str_field(item, "Element") {
            if !name.to_lowercase().contains(&needle) {
                continue;
            }
        }

        rows.push(FaoRow {
            dataset: dataset.to_string(),
            area: string_field(item, "Area"),
            item: string_field(item, "Item"),
            element: string_field(item, "Element"),
            year: year_field(item, "Year"),
            value: lenient_number_field(item, "Value"),
            unit: non_empty_string_field(item, "Unit"),
        });
    }

    Ok(PageMeta::default())
}

/// FAOSTAT observations for one dataset and element across countries
#[derive(Debug, Clone)]
pub struct FaoPipeline {
    dataset: String,
    element: String,
    countries: Vec<String>,
    years: YearFilter,
    base_url: String,
}

impl FaoPipeline {
    /// Create a pipeline; `countries` must already be normalized ISO3 codes
    pub fn new(
        dataset: impl Into<String>,
        element: impl Into<String>,
        countries: Vec<String>,
        years: YearFilter,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            element: element.into(),
            countries,
            years,
            base_url: FAO_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn data_url(&self, country: &str) -> String {
        let mut url = format!(
            "{}en/data/{}?area={}&output_type=objects",
            self.base_url,
            self.dataset,
            fao_area_code(country)
        );
        append_fragment(&mut url, &encode_fao(&self.years));
        url
    }
}

impl ProviderPipeline for FaoPipeline {
    type Row = FaoRow;

    fn plans(&self) -> Vec<RequestPlan> {
        self.countries
            .iter()
            .map(|country| RequestPlan::single(ProviderId::Fao, country.clone(), self.data_url(country)))
            .collect()
    }

    fn decode_page(
        &self,
        body: &str,
        _plan: &RequestPlan,
        rows: &mut Vec<FaoRow>,
    ) -> FetcherResult<PageMeta> {
        decode_page(body, &self.dataset, &self.element, rows)
    }
}
