//! Unit tests for the JSON provider decoders

use serde_json::json;
use sudan_stats::fetcher::catalog::{decode_who_catalog, SearchTerm};
use sudan_stats::fetcher::{fao, search, unhcr, who, worldbank, FetcherError};
use sudan_stats::ProviderId;

#[test]
fn test_worldbank_tolerates_mistyped_fields() {
    let body = json!([
        {"page": 1, "pages": 3, "per_page": 1000, "total": 2500},
        [
            {
                "indicator": {"id": "SP.POP.TOTL", "value": "Population, total"},
                "country": {"id": "SD", "value": "Sudan"},
                "date": "2022",
                "value": 46874204
            },
            {
                "indicator": "SP.POP.TOTL",
                "country": {"id": "SD"},
                "date": "n/a",
                "value": "46874204"
            }
        ]
    ])
    .to_string();

    let mut rows = Vec::new();
    let meta = worldbank::decode_page(&body, &mut rows).unwrap();

    assert_eq!(meta.total_pages, Some(3));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].year, 2022);
    assert_eq!(rows[0].value, Some(46874204.0));

    let broken = &rows[1];
    assert_eq!(broken.indicator_id, None, "indicator must be an object");
    assert_eq!(broken.country.as_deref(), Some("SD"));
    assert_eq!(broken.country_name, None);
    assert_eq!(broken.year, 0);
    assert_eq!(broken.value, None, "string values are not numbers");
}

#[test]
fn test_worldbank_error_envelope() {
    let body = r#"[{"message":[{"id":"120","key":"Invalid value"}]}]"#;
    let mut rows = Vec::new();
    let err = worldbank::decode_page(body, &mut rows).unwrap_err();
    assert!(matches!(err, FetcherError::InvalidResponse(_)));

    let err = worldbank::decode_page("not json", &mut rows).unwrap_err();
    assert!(matches!(err, FetcherError::ParseError(_)));
    assert!(rows.is_empty());
}

#[test]
fn test_who_fallbacks() {
    let body = json!({
        "value": [
            {
                "IndicatorCode": "WHOSIS_000001",
                "SpatialDim": "SDN",
                "TimeDim": 2019,
                "Dim1": "SEX_BTSX",
                "NumericValue": 65.3,
                "ParentLocation": "Eastern Mediterranean"
            },
            {"TimeDim": 2020, "Dim1": "", "NumericValue": null}
        ]
    })
    .to_string();

    let mut rows = Vec::new();
    who::decode_page(&body, "WHOSIS_000001", "EGY", &mut rows).unwrap();

    assert_eq!(rows[0].region.as_deref(), Some("Eastern Mediterranean"));
    assert_eq!(rows[0].sex.as_deref(), Some("SEX_BTSX"));

    assert_eq!(rows[1].indicator_code, "WHOSIS_000001");
    assert_eq!(rows[1].country, "EGY");
    assert_eq!(rows[1].sex, None);
    assert!(!rows[1].has_value());
}

#[test]
fn test_fao_element_filter_and_string_values() {
    let body = json!({
        "data": [
            {"Area": "Sudan", "Item": "Sorghum", "Element": "Production", "Year": "2020", "Value": "5,000", "Unit": "t"},
            {"Area": "Sudan", "Item": "Sorghum", "Element": "Area harvested", "Year": "2020", "Value": 100},
            {"Area": "Sudan", "Item": "Millet", "Element": "PRODUCTION", "Year": 2021, "Value": "1250.5", "Unit": ""},
            {"Area": "Sudan", "Item": "Wheat", "Year": 2021, "Value": 7}
        ]
    })
    .to_string();

    let mut rows = Vec::new();
    fao::decode_page(&body, "QCL", "production", &mut rows).unwrap();

    assert_eq!(rows.len(), 3, "area harvested is filtered out");
    assert_eq!(rows[0].value, None, "unparsable string is absent, not zero");
    assert_eq!(rows[0].unit.as_deref(), Some("t"));
    assert_eq!(rows[1].value, Some(1250.5));
    assert_eq!(rows[1].unit, None);
    assert_eq!(rows[2].item.as_deref(), Some("Wheat"));
    assert_eq!(rows[2].element, None);
    assert!(rows.iter().all(|r| r.dataset == "QCL"));
}

#[test]
fn test_unhcr_layouts() {
    let body = json!({
        "items": [
            {"year": 2022, "coo": "SDN", "coa": "TCD", "refugees": 0, "asylum_seekers": 10},
            {"year": 2022, "coo": "SDN", "coa": "EGY", "refugees": "1500", "asylum_seekers": 0},
            {"year": "2023", "coo": "SDN", "coa_name": "Ethiopia", "refugees": 0}
        ]
    })
    .to_string();

    let mut rows = Vec::new();
    unhcr::decode_page(&body, "ref", &mut rows).unwrap();

    assert_eq!(rows.len(), 2, "aggregate zero is dropped");
    assert_eq!(rows[0].country_asylum.as_deref(), Some("EGY"));
    assert_eq!(rows[0].value, Some(1500));
    assert_eq!(rows[0].population_type, "ref");

    assert_eq!(rows[1].year, 2023);
    assert_eq!(rows[1].value, Some(0), "unified zero is kept");
    assert_eq!(rows[1].country_asylum_name.as_deref(), Some("Ethiopia"));
}

#[test]
fn test_search_and_catalog_filters() {
    let who_body = json!({
        "value": [
            {"IndicatorCode": "MDG_0000000001", "IndicatorName": "Infant mortality rate", "Language": "EN"},
            {"IndicatorCode": "WHOSIS_000001", "IndicatorName": "Life expectancy at birth", "Language": "EN"},
            {"IndicatorName": "No code"}
        ]
    })
    .to_string();

    let term = SearchTerm::new(Some("MORTALITY"));
    let mut catalog = Vec::new();
    decode_who_catalog(&who_body, &term, &mut catalog).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].indicator_code.as_deref(), Some("MDG_0000000001"));

    let everything = SearchTerm::new(Some("  "));
    assert!(everything.is_empty());
    let mut all = Vec::new();
    decode_who_catalog(&who_body, &everything, &mut all).unwrap();
    assert_eq!(all.len(), 3);

    let mut hits = Vec::new();
    search::decode_page(&who_body, ProviderId::Who, &SearchTerm::new(Some("code")), &mut hits)
        .unwrap();
    assert!(hits.is_empty(), "entries without an id never become hits");

    let err = search::decode_page(&who_body, ProviderId::Fao, &term, &mut hits).unwrap_err();
    assert!(matches!(err, FetcherError::InvalidResponse(_)));
}
