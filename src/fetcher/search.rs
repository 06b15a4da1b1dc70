//! Cross-provider indicator search
//!
//! Queries the World Bank WDI catalog (source 2, first page) and the full
//! WHO catalog, returning provider-tagged hits whose code or label contains
//! the query.

use serde_json::Value;

use crate::fetcher::catalog::SearchTerm;
use crate::fetcher::json::{parse_body, str_field};
use crate::fetcher::who::{odata_items, WHO_BASE_URL};
use crate::fetcher::worldbank::{split_envelope, PER_PAGE, WORLDBANK_BASE_URL};
use crate::fetcher::{FetcherError, FetcherResult, PageMeta, ProviderPipeline, RequestPlan};
use crate::{ProviderId, SearchResult};

/// World Bank source id of World Development Indicators
pub const WDI_SOURCE_ID: u32 = 2;

/// Collect hits from `items`, reading code and label from the given keys
///
/// Items lacking either field are skipped.
fn collect_hits(
    items: &[Value],
    provider: ProviderId,
    id_key: &str,
    name_key: &str,
    term: &SearchTerm,
    rows: &mut Vec<SearchResult>,
) {
    for item in items {
        let (Some(id), Some(name)) = (str_field(item, id_key), str_field(item, name_key)) else {
            continue;
        };
        if term.matches(&[Some(id), Some(name)]) {
            rows.push(SearchResult {
                provider,
                indicator_id: id.to_string(),
                indicator_name: name.to_string(),
            });
        }
    }
}

/// Decode one catalog response for `provider`
pub fn decode_page(
    body: &str,
    provider: ProviderId,
    term: &SearchTerm,
    rows: &mut Vec<SearchResult>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;

    match provider {
        ProviderId::WorldBank => {
            let (_, data) = split_envelope(&root)?;
            if let Some(items) = data.as_array() {
                collect_hits(items, provider, "id", "name", term, rows);
            }
        }
        ProviderId::Who => {
            let items = odata_items(&root)?;
            collect_hits(items, provider, "IndicatorCode", "IndicatorName", term, rows);
        }
        other => {
            return Err(FetcherError::InvalidResponse(format!(
                "search is not supported for {other}"
            )))
        }
    }

    Ok(PageMeta::default())
}

/// Indicator search over the World Bank and WHO catalogs
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    term: SearchTerm,
    worldbank_base_url: String,
    who_base_url: String,
}

impl SearchPipeline {
    /// Create a search; `query` should already be validated as non-empty
    pub fn new(query: &str) -> Self {
        Self {
            term: SearchTerm::new(Some(query)),
            worldbank_base_url: WORLDBANK_BASE_URL.to_string(),
            who_base_url: WHO_BASE_URL.to_string(),
        }
    }

    /// Point requests at different API roots (each must end with `/`)
    pub fn with_base_urls(
        mut self,
        worldbank: impl Into<String>,
        who: impl Into<String>,
    ) -> Self {
        self.worldbank_base_url = worldbank.into();
        self.who_base_url = who.into();
        self
    }
}

impl ProviderPipeline for SearchPipeline {
    type Row = SearchResult;

    fn plans(&self) -> Vec<RequestPlan> {
        vec![
            RequestPlan::single(
                ProviderId::WorldBank,
                ProviderId::WorldBank.as_str(),
                format!(
                    "{}indicator?format=json&per_page={}&source={}",
                    self.worldbank_base_url, PER_PAGE, WDI_SOURCE_ID
                ),
            ),
            RequestPlan::single(
                ProviderId::Who,
                ProviderId::Who.as_str(),
                format!("{}Indicator", self.who_base_url),
            ),
        ]
    }

    fn decode_page(
        &self,
        body: &str,
        plan: &RequestPlan,
        rows: &mut Vec<SearchResult>,
    ) -> FetcherResult<PageMeta> {
        decode_page(body, plan.provider, &self.term, rows)
    }
}
