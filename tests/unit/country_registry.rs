//! Unit tests for the embedded provider and country registry

use sudan_stats::registry::{
    fao_area_code, normalize_countries, normalize_country_code, validate_country_codes,
    SourceRegistry, DEFAULT_COUNTRY,
};
use sudan_stats::ProviderId;

#[test]
fn test_registry_lists_every_provider() {
    let registry = SourceRegistry::load().unwrap();
    for id in ProviderId::ALL {
        let provider = registry.provider(id).unwrap();
        assert!(provider.base_url.starts_with("https://"), "{id}");
        assert!(!provider.name_ar.is_empty(), "{id}");
    }
}

#[test]
fn test_normalization() {
    assert_eq!(normalize_country_code("SD"), "SDN");
    assert_eq!(normalize_country_code("ss"), "SSD");
    assert_eq!(normalize_country_code("TCD"), "TCD");
    assert_eq!(normalize_country_code("FRA"), "FRA");

    assert_eq!(normalize_countries(["ER", " ly "]), vec!["ERI", "LBY"]);
    assert_eq!(normalize_countries([""]), vec![DEFAULT_COUNTRY]);
}

#[test]
fn test_validation_and_fao_codes() {
    assert!(validate_country_codes(&["SD", "CAF", "eg"]));
    assert!(!validate_country_codes(&["SD", "FRA"]));

    assert_eq!(fao_area_code("SDN"), "276");
    assert_eq!(fao_area_code("SSD"), "277");
    assert_eq!(fao_area_code("FRA"), "FRA");
}
