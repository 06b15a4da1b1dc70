//! Provider and country reference data
//!
//! The registry lists the supported providers and the countries queries may
//! target. It is embedded at compile time, parsed once on first use and never
//! mutated afterwards.

use crate::{ProviderId, Scalar, TabularRow};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded registry data
const SOURCES_JSON: &str = include_str!("sources.json");

/// Country queried when the caller names none
pub const DEFAULT_COUNTRY: &str = "SDN";

/// Global registry instance (loaded once)
static REGISTRY: Lazy<Result<SourceRegistry, RegistryError>> =
    Lazy::new(|| SourceRegistry::from_json(SOURCES_JSON));

/// Registry of supported providers and countries
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    #[allow(dead_code)]
    schema_version: String,
    #[allow(dead_code)]
    last_updated: String,
    providers: Vec<ProviderDescriptor>,
    countries: Vec<CountryDescriptor>,
    /// Upper-cased ISO2 and ISO3 codes -> index into `countries`
    code_index: HashMap<String, usize>,
}

impl SourceRegistry {
    /// Load the embedded registry
    ///
    /// This is a singleton operation - the registry is loaded once and cached.
    pub fn load() -> Result<&'static Self, &'static RegistryError> {
        REGISTRY.as_ref()
    }

    /// Load embedded registry, returning an owned copy
    pub fn load_embedded() -> Result<Self, RegistryError> {
        Self::from_json(SOURCES_JSON)
    }

    /// Parse registry from JSON string
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawRegistry = serde_json::from_str(json)
            .map_err(|e| RegistryError::ParseError(format!("Failed to parse registry: {e}")))?;

        let mut code_index = HashMap::new();
        for (i, country) in raw.countries.iter().enumerate() {
            code_index.insert(country.iso3.to_ascii_uppercase(), i);
            code_index.insert(country.iso2.to_ascii_uppercase(), i);
        }

        Ok(Self {
            schema_version: raw.schema_version,
            last_updated: raw.last_updated,
            providers: raw.providers,
            countries: raw.countries,
            code_index,
        })
    }

    /// All providers, in registry order
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// All supported countries, in registry order
    pub fn countries(&self) -> &[CountryDescriptor] {
        &self.countries
    }

    /// Look up a provider descriptor
    pub fn provider(&self, id: ProviderId) -> Result<&ProviderDescriptor, RegistryError> {
        self.providers
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("Provider {id} not found in registry")))
    }

    /// Look up a country by ISO2 or ISO3 code (case-insensitive)
    pub fn country(&self, code: &str) -> Option<&CountryDescriptor> {
        self.code_index
            .get(&code.trim().to_ascii_uppercase())
            .map(|&i| &self.countries[i])
    }

    /// Map a supported ISO2/ISO3 code to its ISO3 form
    ///
    /// Unsupported codes are returned trimmed but otherwise unchanged.
    pub fn normalize_country_code(&self, code: &str) -> String {
        match self.country(code) {
            Some(country) => country.iso3.clone(),
            None => code.trim().to_string(),
        }
    }

    /// True iff every code is a supported ISO2 or ISO3 code
    pub fn validate_country_codes<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().all(|c| self.country(c.as_ref()).is_some())
    }

    /// FAOSTAT numeric area code for an ISO3 code, or the code itself when unknown
    pub fn fao_area_code(&self, iso3: &str) -> String {
        self.country(iso3)
            .and_then(|c| c.fao_area_code)
            .map(|code| code.to_string())
            .unwrap_or_else(|| iso3.to_string())
    }
}

/// Normalize a single country code against the embedded registry
pub fn normalize_country_code(code: &str) -> String {
    match SourceRegistry::load() {
        Ok(registry) => registry.normalize_country_code(code),
        Err(_) => code.trim().to_string(),
    }
}

/// Normalize a caller-supplied country list
///
/// Blank entries are skipped. An empty result falls back to
/// [`DEFAULT_COUNTRY`], so a query always targets at least one country.
pub fn normalize_countries<I, S>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = codes
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .map(|c| normalize_country_code(&c))
        .collect();

    if out.is_empty() {
        out.push(DEFAULT_COUNTRY.to_string());
    }
    out
}

/// True iff every code is a supported ISO2 or ISO3 code
pub fn validate_country_codes<S: AsRef<str>>(codes: &[S]) -> bool {
    match SourceRegistry::load() {
        Ok(registry) => registry.validate_country_codes(codes),
        Err(_) => false,
    }
}

/// FAOSTAT area code for an ISO3 code against the embedded registry
pub fn fao_area_code(iso3: &str) -> String {
    match SourceRegistry::load() {
        Ok(registry) => registry.fao_area_code(iso3),
        Err(_) => iso3.to_string(),
    }
}

/// Static description of a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderDescriptor {
    /// Provider identifier
    pub id: ProviderId,
    /// English display name
    pub name: String,
    /// Arabic display name
    pub name_ar: String,
    /// Free-text description
    pub description: String,
    /// API base URL
    pub base_url: String,
}

impl TabularRow for ProviderDescriptor {
    const COLUMNS: &'static [&'static str] =
        &["provider_id", "name", "name_ar", "description", "base_url"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            self.id.as_str().into(),
            (&self.name).into(),
            (&self.name_ar).into(),
            (&self.description).into(),
            (&self.base_url).into(),
        ]
    }
}

/// Static description of a supported country
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryDescriptor {
    /// ISO 3166-1 alpha-3 code
    pub iso3: String,
    /// ISO 3166-1 alpha-2 code
    pub iso2: String,
    /// English display name
    pub name: String,
    /// Arabic display name
    pub name_ar: String,
    /// FAOSTAT numeric area code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fao_area_code: Option<u32>,
}

impl TabularRow for CountryDescriptor {
    const COLUMNS: &'static [&'static str] = &["iso3", "iso2", "name", "name_ar"];

    fn values(&self) -> Vec<Scalar> {
        vec![
            (&self.iso3).into(),
            (&self.iso2).into(),
            (&self.name).into(),
            (&self.name_ar).into(),
        ]
    }
}

/// Raw registry structure for deserialization
#[derive(Debug, Deserialize)]
struct RawRegistry {
    schema_version: String,
    last_updated: String,
    providers: Vec<ProviderDescriptor>,
    countries: Vec<CountryDescriptor>,
}

/// Errors that can occur when working with the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to parse registry JSON
    #[error("registry parse error: {0}")]
    ParseError(String),

    /// Entry not found in registry
    #[error("not found: {0}")]
    NotFound(String),
}
