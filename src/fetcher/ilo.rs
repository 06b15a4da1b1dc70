//! ILOSTAT SDMX data
//!
//! The number of dimensions after `REF_AREA.FREQ` differs per dataflow, and
//! SDMX wildcards a position by leaving it empty between dots. Without
//! fetching the dataflow's structure first we cannot know how many dots the
//! key needs, so candidate keys with one to five trailing dots are probed in
//! order and the first one that answers is decoded.

use crate::fetcher::sdmx;
use crate::fetcher::{FetcherResult, PageMeta, ProviderPipeline, RequestPlan, RequestStrategy};
use crate::filter::{append_fragment, encode_ilo, YearFilter};
use crate::{IloRow, ProviderId};

/// ILO SDMX REST base URL
pub const ILO_BASE_URL: &str = "https://sdmx.ilo.org/rest/";

/// Largest number of wildcard positions tried after the frequency
pub const MAX_KEY_WILDCARDS: usize = 5;

/// Observations requested per series
pub const LAST_N_OBSERVATIONS: u32 = 20;

/// Dataflow id for an indicator, adding the `DF_` prefix when missing
pub fn dataflow_id(indicator: &str) -> String {
    if indicator.starts_with("DF_") {
        indicator.to_string()
    } else {
        format!("DF_{indicator}")
    }
}

/// ILO observations for one indicator across countries
#[derive(Debug, Clone)]
pub struct IloPipeline {
    indicator: String,
    countries: Vec<String>,
    years: YearFilter,
    base_url: String,
}

impl IloPipeline {
    /// Create a pipeline; `countries` must already be normalized ISO3 codes
    pub fn new(indicator: impl Into<String>, countries: Vec<String>, years: YearFilter) -> Self {
        Self {
            indicator: indicator.into(),
            countries,
            years,
            base_url: ILO_BASE_URL.to_string(),
        }
    }

    /// Point requests at a different API root (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Candidate URLs for one country, fewest wildcards first
    pub fn candidate_urls(&self, country: &str) -> Vec<String> {
        let key_base = format!(
            "{}data/ILO,{}/{}.A",
            self.base_url,
            dataflow_id(&self.indicator),
            country
        );
        let mut query = format!(
            "?format=jsondata&detail=dataonly&lastNObservations={LAST_N_OBSERVATIONS}"
        );
        append_fragment(&mut query, &encode_ilo(&self.years));

        (1..=MAX_KEY_WILDCARDS)
            .map(|dots| format!("{key_base}{}{query}", ".".repeat(dots)))
            .collect()
    }
}

impl ProviderPipeline for IloPipeline {
    type Row = IloRow;

    fn plans(&self) -> Vec<RequestPlan> {
        self.countries
            .iter()
            .map(|country| RequestPlan {
                provider: ProviderId::Ilo,
                scope: country.clone(),
                strategy: RequestStrategy::Probe {
                    candidates: self.candidate_urls(country),
                },
            })
            .collect()
    }

    fn decode_page(
        &self,
        body: &str,
        plan: &RequestPlan,
        rows: &mut Vec<IloRow>,
    ) -> FetcherResult<PageMeta> {
        sdmx::decode_page(body, &self.indicator, &plan.scope, rows)
    }
}
