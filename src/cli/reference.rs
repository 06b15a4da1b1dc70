//! Reference data, indicator catalogs and search

use clap::Args;

use super::emit::{emit, OutputOptions};
use super::CliError;
use crate::query::{QueryExecutor, SearchQuery};
use crate::registry::{RegistryError, SourceRegistry};

/// Arguments of the catalog commands
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Keep indicators whose code or name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
}

/// Supported providers
pub fn providers(output: &OutputOptions) -> Result<(), CliError> {
    emit(QueryExecutor::providers()?, output)
}

/// Supported countries
pub fn countries(output: &OutputOptions) -> Result<(), CliError> {
    emit(QueryExecutor::countries()?, output)
}

/// World Bank indicator catalog
pub async fn wb_indicators(
    executor: &QueryExecutor,
    args: &CatalogArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    emit(executor.wb_indicators(args.search.as_deref()).await, output)
}

/// WHO indicator catalog
pub async fn who_indicators(
    executor: &QueryExecutor,
    args: &CatalogArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    emit(executor.who_indicators(args.search.as_deref()).await, output)
}

/// Indicator search across the World Bank and WHO catalogs
pub async fn search(
    executor: &QueryExecutor,
    query: &str,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let query = SearchQuery::new(query)?;
    emit(executor.search(&query).await, output)
}

/// Check that every code is a supported ISO2 or ISO3 country code
pub fn validate(codes: &[String]) -> Result<(), CliError> {
    let registry =
        SourceRegistry::load().map_err(|e| RegistryError::ParseError(e.to_string()))?;

    let unknown: Vec<&str> = codes
        .iter()
        .map(String::as_str)
        .filter(|code| registry.country(code).is_none())
        .collect();

    if registry.validate_country_codes(codes) {
        for code in codes {
            println!("{code} -> {}", registry.normalize_country_code(code));
        }
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "unsupported country codes: {}",
            unknown.join(", ")
        )))
    }
}
