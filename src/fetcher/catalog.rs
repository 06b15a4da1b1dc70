//! Indicator catalogs
//!
//! The World Bank catalog is paged like observation data; the WHO catalog
//! arrives in one OData response. Both can be narrowed by a search term,
//! matched case-insensitively against the indicator code and label.

use serde_json::Value;

use crate::fetcher::json::{nested_string_field, non_empty_string_field, parse_body, string_field};
use crate::fetcher::who::{odata_items, WHO_BASE_URL};
use crate::fetcher::worldbank::{page_meta, split_envelope, PER_PAGE, WORLDBANK_BASE_URL};
use crate::fetcher::{FetcherResult, PageMeta, ProviderPipeline, RequestPlan, RequestStrategy};
use crate::{ProviderId, WbIndicatorInfo, WhoIndicatorInfo};

/// Lowercased search term; blank terms match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    /// Build from an optional caller term
    pub fn new(term: Option<&str>) -> Self {
        Self(
            term.map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase),
        )
    }

    /// True when no filtering applies
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Case-insensitive substring match against any of `fields`
    pub fn matches(&self, fields: &[Option<&str>]) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => fields
                .iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Decode one World Bank catalog page, keeping entries matching `term`
pub fn decode_wb_catalog_page(
    body: &str,
    term: &SearchTerm,
    rows: &mut Vec<WbIndicatorInfo>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let (meta, data) = split_envelope(&root)?;

    if let Some(items) = data.as_array() {
        rows.extend(
            items
                .iter()
                .map(|item| WbIndicatorInfo {
                    indicator_id: string_field(item, "id"),
                    indicator_name: string_field(item, "name"),
                    source: nested_string_field(item, "source", "value"),
                    source_note: non_empty_string_field(item, "sourceNote"),
                })
                .filter(|info| {
                    term.matches(&[info.indicator_id.as_deref(), info.indicator_name.as_deref()])
                }),
        );
    }

    Ok(page_meta(meta))
}

/// Decode the WHO catalog, keeping entries matching `term`
pub fn decode_who_catalog(
    body: &str,
    term: &SearchTerm,
    rows: &mut Vec<WhoIndicatorInfo>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let items = odata_items(&root)?;

    rows.extend(
        items
            .iter()
            .map(|item| WhoIndicatorInfo {
                indicator_code: string_field(item, "IndicatorCode"),
                indicator_name: string_field(item, "IndicatorName"),
                language: string_field(item, "Language"),
            })
            .filter(|info| {
                term.matches(&[info.indicator_code.as_deref(), info.indicator_name.as_deref()])
            }),
    );

    Ok(PageMeta::default())
}

/// World Bank indicator catalog, all pages
#[derive(Debug, Clone)]
pub struct WbIndicatorCatalog {
    term: SearchTerm,
    base_url: String,
}

impl WbIndicatorCatalog {
    /// Create a catalog listing, optionally filtered
    pub fn new(term: Option<&str>) -> Self {
        Self {
            term: SearchTerm::new(term),
            base_url: WORLDBANK_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ProviderPipeline for WbIndicatorCatalog {
    type Row = WbIndicatorInfo;

    fn plans(&self) -> Vec<RequestPlan> {
        vec![RequestPlan {
            provider: ProviderId::WorldBank,
            scope: "indicators".to_string(),
            strategy: RequestStrategy::Paged {
                prefix: format!(
                    "{}indicator?format=json&per_page={}&page=",
                    self.base_url, PER_PAGE
                ),
                suffix: String::new(),
            },
        }]
    }

    fn decode_page(
        &self,
        body: &str,
        _plan: &RequestPlan,
        rows: &mut Vec<WbIndicatorInfo>,
    ) -> FetcherResult<PageMeta> {
        decode_wb_catalog_page(body, &self.term, rows)
    }
}

/// WHO GHO indicator catalog
#[derive(Debug, Clone)]
pub struct WhoIndicatorCatalog {
    term: SearchTerm,
    base_url: String,
}

impl WhoIndicatorCatalog {
    /// Create a catalog listing, optionally filtered
    pub fn new(term: Option<&str>) -> Self {
        Self {
            term: SearchTerm::new(term),
            base_url: WHO_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ProviderPipeline for WhoIndicatorCatalog {
    type Row = WhoIndicatorInfo;

    fn plans(&self) -> Vec<RequestPlan> {
        vec![RequestPlan::single(
            ProviderId::Who,
            "indicators",
            format!("{}Indicator", self.base_url),
        )]
    }

    fn decode_page(
        &self,
        body: &str,
        _plan: &RequestPlan,
        rows: &mut Vec<WhoIndicatorInfo>,
    ) -> FetcherResult<PageMeta> {
        decode_who_catalog(body, &self.term, rows)
    }
}
