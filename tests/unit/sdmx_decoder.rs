//! Unit tests for SDMX-JSON key resolution

use serde_json::{json, Value};
use sudan_stats::fetcher::sdmx::{decode_page, parse_key, DimensionIndex, MessageStructure};
use sudan_stats::fetcher::FetcherError;

fn ilostat_structure() -> Value {
    json!({
        "dimensions": {
            "series": [
                {"id": "REF_AREA", "values": [{"id": "SDN"}, {"id": "EGY"}, {"id": "ETH"}]},
                {"id": "FREQ", "values": [{"id": "A"}, {"id": "Q"}, {"id": "M"}]},
                {"id": "SEX", "values": [{"id": "SEX_T"}, {"id": "SEX_M"}, {"id": "SEX_F"}]}
            ],
            "observation": [
                {"id": "TIME_PERIOD", "values": [{"id": "2019"}, {"id": "2020"}]}
            ]
        }
    })
}

#[test]
fn test_dimension_index_lookup() {
    let structure = MessageStructure::from_structure(Some(&ilostat_structure()));
    assert_eq!(structure.series.len(), 3);
    assert!(structure.series.contains("SEX"));
    assert!(!structure.series.contains("AGE"));

    let key = parse_key("2:0:1");
    assert_eq!(structure.series.resolve("REF_AREA", &key), "ETH");
    assert_eq!(structure.series.resolve("SEX", &key), "SEX_M");
    assert_eq!(structure.series.resolve("AGE", &key), "");
    assert_eq!(structure.series.resolve("SEX", &parse_key("0:0:9")), "");
    assert_eq!(structure.series.resolve("SEX", &parse_key("0")), "", "key too short");
}

#[test]
fn test_value_labels_fall_back_to_name() {
    let dimensions = json!([
        {"id": "AGE", "values": [{"name": "15+"}, {"id": "Y15-24", "name": "15-24"}, {}]},
        {"name": "unnamed", "values": [{"id": "X"}]}
    ]);
    let index = DimensionIndex::from_dimensions(Some(&dimensions));

    assert_eq!(index.len(), 1, "dimension without an id is not addressable");
    assert_eq!(index.resolve("AGE", &[0]), "15+");
    assert_eq!(index.resolve("AGE", &[1]), "Y15-24");
    assert_eq!(index.resolve("AGE", &[2]), "");

    assert!(DimensionIndex::from_dimensions(None).is_empty());
}

#[test]
fn test_series_message_decodes_first_data_set_only() {
    let body = json!({
        "structure": ilostat_structure(),
        "dataSets": [
            {"series": {"0:0:1": {"observations": {"1": [42.5]}}}},
            {"series": {"0:0:2": {"observations": {"0": [99.0]}}}}
        ]
    })
    .to_string();

    let mut rows = Vec::new();
    decode_page(&body, "UNE_DEAP_SEX_AGE_RT", "SDN", &mut rows).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sex.as_deref(), Some("SEX_M"));
    assert_eq!(rows[0].year, 2020);
    assert_eq!(rows[0].value, Some(42.5));
    assert_eq!(rows[0].country, "SDN");
}

#[test]
fn test_flat_observations_under_data_wrapper() {
    let body = json!({
        "data": {
            "structure": {
                "dimensions": {
                    "observation": [
                        {"id": "SEX", "values": [{"id": "SEX_T"}, {"id": "SEX_F"}]},
                        {"id": "AGE", "values": [{"id": "AGE_YTHADULT_YGE15"}]},
                        {"id": "TIME_PERIOD", "values": [{"id": "2018"}, {"id": "2019-Q4"}]}
                    ]
                }
            },
            "dataSets": [{
                "observations": {
                    "1:0:1": [18.25],
                    "0:0:0": ["n/a"],
                    "0:0:9": [3]
                }
            }]
        }
    })
    .to_string();

    let mut rows = Vec::new();
    decode_page(&body, "EAP_DWAP_SEX_AGE_RT", "SSD", &mut rows).unwrap();
    rows.sort_by_key(|r| r.year);

    assert_eq!(rows.len(), 2, "non-numeric observation is dropped");

    assert_eq!(rows[0].year, 0, "time index out of range");
    assert_eq!(rows[0].sex.as_deref(), Some("SEX_T"));

    assert_eq!(rows[1].year, 2019);
    assert_eq!(rows[1].sex.as_deref(), Some("SEX_F"));
    assert_eq!(rows[1].classif1.as_deref(), Some("AGE_YTHADULT_YGE15"));
    assert_eq!(rows[1].value, Some(18.25));
}

#[test]
fn test_missing_or_empty_data_sets() {
    let mut rows = Vec::new();

    let err = decode_page(r#"{"structure": {}}"#, "X", "SDN", &mut rows).unwrap_err();
    assert!(matches!(err, FetcherError::InvalidResponse(_)));

    let err = decode_page(r#"{"dataSets": []}"#, "X", "SDN", &mut rows).unwrap_err();
    assert!(matches!(err, FetcherError::InvalidResponse(_)));

    decode_page(r#"{"dataSets": [{}]}"#, "X", "SDN", &mut rows).unwrap();
    assert!(rows.is_empty());
}
