//! UNHCR population statistics
//!
//! Each country is queried twice, once as country of origin (`coo`) and once
//! as country of asylum (`coa`). Both result sets are kept in full; a record
//! present in both is emitted twice.
//!
//! Two item layouts are seen in responses:
//! - aggregate: every population type has its own field (`refugees`,
//!   `asylum_seekers`, `idps`, `ooc`, ...). The requested type's field is
//!   the value and a zero means "no data", so the record is dropped.
//! - unified: one count per record under the first present of a fixed list
//!   of candidate fields. Presence decides and zero is a real observation.

use serde_json::Value;

use crate::fetcher::json::{lenient_int_field, parse_body, string_field, year_field};
use crate::fetcher::{
    FetcherError, FetcherResult, PageMeta, ProviderPipeline, RequestPlan, RequestStrategy,
};
use crate::filter::{append_fragment, encode_unhcr, YearFilter};
use crate::{ProviderId, UnhcrRow};

/// UNHCR population API base URL
pub const UNHCR_BASE_URL: &str = "https://api.unhcr.org/population/v1/";

/// Records requested per call
pub const PAGE_LIMIT: u32 = 10_000;

/// Query parameters tried for every country, in order
pub const COUNTRY_SIDES: [&str; 2] = ["coo", "coa"];

/// Value fields of the unified layout, in lookup order
const UNIFIED_VALUE_FIELDS: [&str; 6] = [
    "refugees",
    "idps",
    "asylum_seekers",
    "returned_refugees",
    "stateless",
    "total",
];

/// Per-type fields of the aggregate layout
const AGGREGATE_FIELDS: [&str; 9] = [
    "refugees",
    "asylum_seekers",
    "returned_refugees",
    "idps",
    "returned_idps",
    "stateless",
    "ooc",
    "oip",
    "hst",
];

/// Map a caller's population type to the API path segment
///
/// Known aliases are folded (`ref` -> `refugees`, `asylum` ->
/// `asylum-seekers`, ...); anything else is lowercased and passed through.
pub fn population_type_path(population_type: &str) -> String {
    let lower = population_type.trim().to_lowercase();
    match lower.as_str() {
        "refugees" | "ref" => "refugees".to_string(),
        "idps" | "idp" => "idps".to_string(),
        "asylum_seekers" | "asylum" | "asylum-seekers" => "asylum-seekers".to_string(),
        "returned_refugees" | "returned" | "returned-refugees" => "returned-refugees".to_string(),
        "stateless" => "stateless".to_string(),
        _ => lower,
    }
}

/// Field name of the requested type in the aggregate layout
fn population_type_field(population_type: &str) -> String {
    population_type_path(population_type).replace('-', "_")
}

/// Which value layout an item uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLayout {
    /// One field per population type; zero drops the record
    Aggregate,
    /// First present candidate field; zero is kept
    Unified,
}

impl ItemLayout {
    /// Detect the layout of one item: two or more per-type fields means aggregate
    pub fn detect(item: &Value) -> Self {
        let present = AGGREGATE_FIELDS
            .iter()
            .filter(|field| item.get(**field).is_some())
            .count();
        if present >= 2 {
            ItemLayout::Aggregate
        } else {
            ItemLayout::Unified
        }
    }
}

/// Decode one `{ "items": [...] }` response
pub fn decode_page(
    body: &str,
    population_type: &str,
    rows: &mut Vec<UnhcrRow>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let items = root
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| FetcherError::InvalidResponse("missing items array".to_string()))?;

    let type_field = population_type_field(population_type);

    for item in items {
        let value = match ItemLayout::detect(item) {
            ItemLayout::Aggregate => match lenient_int_field(item, &type_field) {
                Some(0) => continue,
                other => other,
            },
            ItemLayout::Unified => UNIFIED_VALUE_FIELDS
                .iter()
                .find(|field| item.get(**field).is_some())
                .and_then(|field| lenient_int_field(item, field)),
        };

        rows.push(UnhcrRow {
            year: year_field(item, "year"),
            population_type: population_type.to_string(),
            country_origin: string_field(item, "coo"),
            country_origin_name: string_field(item, "coo_name"),
            country_asylum: string_field(item, "coa"),
            country_asylum_name: string_field(item, "coa_name"),
            value,
        });
    }

    Ok(PageMeta::default())
}

/// UNHCR records for one population type across countries
#[derive(Debug, Clone)]
pub struct UnhcrPipeline {
    population_type: String,
    countries: Vec<String>,
    years: YearFilter,
    base_url: String,
}

impl UnhcrPipeline {
    /// Create a pipeline; `countries` must already be normalized ISO3 codes
    pub fn new(population_type: impl Into<String>, countries: Vec<String>, years: YearFilter) -> Self {
        Self {
            population_type: population_type.into(),
            countries,
            years,
            base_url: UNHCR_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ProviderPipeline for UnhcrPipeline {
    type Row = UnhcrRow;

    fn plans(&self) -> Vec<RequestPlan> {
        let path = population_type_path(&self.population_type);
        let filter = encode_unhcr(&self.years);

        self.countries
            .iter()
            .map(|country| {
                let urls = COUNTRY_SIDES
                    .iter()
                    .map(|side| {
                        let mut url = format!(
                            "{}{}/?limit={}&{}={}",
                            self.base_url, path, PAGE_LIMIT, side, country
                        );
                        append_fragment(&mut url, &filter);
                        url
                    })
                    .collect();

                RequestPlan {
                    provider: ProviderId::Unhcr,
                    scope: country.clone(),
                    strategy: RequestStrategy::Each { urls },
                }
            })
            .collect()
    }

    fn decode_page(
        &self,
        body: &str,
        _plan: &RequestPlan,
        rows: &mut Vec<UnhcrRow>,
    ) -> FetcherResult<PageMeta> {
        decode_page(body, &self.population_type, rows)
    }
}
