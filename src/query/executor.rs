//! Query executor
//!
//! One parameterized path serves every provider: build the provider's
//! pipeline from the validated query, drive it through the shared
//! [`CachedFetcher`], wrap the rows in a [`QueryResultSet`].

use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::job::{FaoQuery, IndicatorQuery, SearchQuery, UnhcrQuery};
use super::results::QueryResultSet;
use super::{QueryError, QueryResult};
use crate::cache::ResponseCache;
use crate::fetcher::catalog::{WbIndicatorCatalog, WhoIndicatorCatalog};
use crate::fetcher::fao::FaoPipeline;
use crate::fetcher::ilo::IloPipeline;
use crate::fetcher::pagination::run_pipeline;
use crate::fetcher::search::SearchPipeline;
use crate::fetcher::unhcr::UnhcrPipeline;
use crate::fetcher::who::WhoPipeline;
use crate::fetcher::worldbank::WorldBankPipeline;
use crate::fetcher::{CachedFetcher, FetchConfig, HttpTransport, ProviderPipeline, Transport};
use crate::registry::{CountryDescriptor, ProviderDescriptor, RegistryError, SourceRegistry};
use crate::{
    FaoRow, IloRow, ProviderId, SearchResult, UnhcrRow, WbIndicatorInfo, WhoIndicatorInfo, WhoRow,
    WorldBankRow,
};

/// Runs queries against the providers through one response cache
///
/// Cheap to clone; clones share the transport and the cache.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    fetcher: CachedFetcher,
}

impl QueryExecutor {
    /// Executor over the shared HTTP client
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self::with_transport(Arc::new(HttpTransport::shared()), cache)
    }

    /// Executor with a custom transport configuration
    ///
    /// # Errors
    /// [`QueryError::Configuration`] when the HTTP client cannot be built.
    pub fn with_config(config: &FetchConfig, cache: Arc<ResponseCache>) -> QueryResult<Self> {
        let transport =
            HttpTransport::new(config).map_err(|e| QueryError::Configuration(e.to_string()))?;
        Ok(Self::with_transport(Arc::new(transport), cache))
    }

    /// Executor over any [`Transport`]
    pub fn with_transport(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>) -> Self {
        Self {
            fetcher: CachedFetcher::new(transport, cache),
        }
    }

    /// The response cache shared by every query of this executor
    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.fetcher.cache()
    }

    async fn run<P: ProviderPipeline>(&self, pipeline: &P) -> QueryResultSet<P::Row> {
        QueryResultSet::new(run_pipeline(&self.fetcher, pipeline).await)
    }

    /// World Bank observations
    pub async fn worldbank(&self, query: &IndicatorQuery) -> QueryResultSet<WorldBankRow> {
        let pipeline =
            WorldBankPipeline::new(query.indicator(), query.countries().to_vec(), query.years());
        let results = self.run(&pipeline).await;
        info!(
            provider = %ProviderId::WorldBank,
            indicator = %query.indicator(),
            countries = query.countries().len(),
            rows = results.len(),
            "Query complete"
        );
        results
    }

    /// WHO GHO observations
    pub async fn who(&self, query: &IndicatorQuery) -> QueryResultSet<WhoRow> {
        let pipeline = WhoPipeline::new(query.indicator(), query.countries().to_vec(), query.years());
        let results = self.run(&pipeline).await;
        info!(
            provider = %ProviderId::Who,
            indicator = %query.indicator(),
            countries = query.countries().len(),
            rows = results.len(),
            "Query complete"
        );
        results
    }

    /// FAOSTAT observations
    pub async fn fao(&self, query: &FaoQuery) -> QueryResultSet<FaoRow> {
        let pipeline = FaoPipeline::new(
            query.dataset(),
            query.element(),
            query.countries().to_vec(),
            query.years(),
        );
        let results = self.run(&pipeline).await;
        info!(
            provider = %ProviderId::Fao,
            dataset = %query.dataset(),
            element = %query.element(),
            countries = query.countries().len(),
            rows = results.len(),
            "Query complete"
        );
        results
    }

    /// UNHCR population figures
    pub async fn unhcr(&self, query: &UnhcrQuery) -> QueryResultSet<UnhcrRow> {
        let pipeline =
            UnhcrPipeline::new(query.population_type(), query.countries().to_vec(), query.years());
        let results = self.run(&pipeline).await;
        info!(
            provider = %ProviderId::Unhcr,
            population_type = %query.population_type(),
            countries = query.countries().len(),
            rows = results.len(),
            "Query complete"
        );
        results
    }

    /// ILOSTAT observations
    pub async fn ilo(&self, query: &IndicatorQuery) -> QueryResultSet<IloRow> {
        let pipeline = IloPipeline::new(query.indicator(), query.countries().to_vec(), query.years());
        let results = self.run(&pipeline).await;
        info!(
            provider = %ProviderId::Ilo,
            indicator = %query.indicator(),
            countries = query.countries().len(),
            rows = results.len(),
            "Query complete"
        );
        results
    }

    /// World Bank indicator catalog, optionally filtered by `search`
    pub async fn wb_indicators(&self, search: Option<&str>) -> QueryResultSet<WbIndicatorInfo> {
        let results = self.run(&WbIndicatorCatalog::new(search)).await;
        info!(provider = %ProviderId::WorldBank, rows = results.len(), "Catalog complete");
        results
    }

    /// WHO indicator catalog, optionally filtered by `search`
    pub async fn who_indicators(&self, search: Option<&str>) -> QueryResultSet<WhoIndicatorInfo> {
        let results = self.run(&WhoIndicatorCatalog::new(search)).await;
        info!(provider = %ProviderId::Who, rows = results.len(), "Catalog complete");
        results
    }

    /// Indicator search across the World Bank and WHO catalogs
    pub async fn search(&self, query: &SearchQuery) -> QueryResultSet<SearchResult> {
        let results = self.run(&SearchPipeline::new(query.query())).await;
        info!(query = %query.query(), rows = results.len(), "Search complete");
        results
    }

    /// Supported providers, from the embedded registry without network access
    ///
    /// # Errors
    /// [`QueryError::Registry`] when the embedded reference data failed to load.
    pub fn providers() -> QueryResult<QueryResultSet<ProviderDescriptor>> {
        Ok(QueryResultSet::new(registry()?.providers().to_vec()))
    }

    /// Supported countries
    ///
    /// # Errors
    /// [`QueryError::Registry`] when the embedded reference data failed to load.
    pub fn countries() -> QueryResult<QueryResultSet<CountryDescriptor>> {
        Ok(QueryResultSet::new(registry()?.countries().to_vec()))
    }

    /// Descriptor of one provider by id (`worldbank`, `wb`, `who`, ...)
    ///
    /// # Errors
    /// [`QueryError::UnknownProvider`] for unsupported ids.
    pub fn provider(id: &str) -> QueryResult<ProviderDescriptor> {
        let provider =
            ProviderId::from_str(id).map_err(|_| QueryError::UnknownProvider(id.to_string()))?;
        Ok(registry()?.provider(provider)?.clone())
    }
}

fn registry() -> QueryResult<&'static SourceRegistry> {
    SourceRegistry::load().map_err(|e| RegistryError::ParseError(e.to_string()).into())
}
