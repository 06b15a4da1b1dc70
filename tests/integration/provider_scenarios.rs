//! Provider pipelines driven through the executor

use crate::support::{executor, ScriptedTransport};
use serde_json::json;
use sudan_stats::query::{FaoQuery, IndicatorQuery, SearchQuery, UnhcrQuery};
use sudan_stats::{ProviderId, YearFilter};

#[tokio::test]
async fn test_unhcr_origin_and_asylum_merged_with_zero_drop() {
    let transport = ScriptedTransport::new();
    let base = "https://api.unhcr.org/population/v1/refugees/?limit=10000";
    transport
        .ok(
            &format!("{base}&coo=SDN"),
            json!({"items": [
                {"year": 2023, "coo": "SDN", "coa": "TCD", "refugees": 150, "asylum_seekers": 3, "idps": 0},
                {"year": 2023, "coo": "SDN", "coa": "CAF", "refugees": 0, "asylum_seekers": 1, "idps": 0}
            ]})
            .to_string(),
        )
        .ok(
            &format!("{base}&coa=SDN"),
            json!({"items": [
                {"year": 2023, "coo": "SDN", "coa": "TCD", "refugees": 150, "asylum_seekers": 3, "idps": 0},
                {"year": 2023, "coo": "SSD", "coa": "SDN", "refugees": 800000, "asylum_seekers": 0, "idps": 0}
            ]})
            .to_string(),
        );

    let query = UnhcrQuery::new("ref").unwrap();
    let results = executor(&transport).unhcr(&query).await;

    let values: Vec<_> = results.rows().iter().map(|r| r.value).collect();
    assert_eq!(values, vec![Some(150), Some(150), Some(800000)]);
    assert!(results.rows().iter().all(|r| r.population_type == "ref"));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_unhcr_one_side_failing_keeps_other() {
    let transport = ScriptedTransport::new();
    transport.ok(
        "https://api.unhcr.org/population/v1/idps/?limit=10000&coa=SDN&yearFrom=2020&yearTo=2023",
        json!({"items": [{"year": 2022, "idps": 0}]}).to_string(),
    );

    let query = UnhcrQuery::new("idp")
        .unwrap()
        .with_years(YearFilter::between(2020, 2023));
    let results = executor(&transport).unhcr(&query).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results.rows()[0].value, Some(0), "unified layout keeps zero");
}

#[tokio::test]
async fn test_ilo_probes_until_key_pattern_matches() {
    let transport = ScriptedTransport::new();
    let candidate = |dots: usize| {
        format!(
            "https://sdmx.ilo.org/rest/data/ILO,DF_UNE_DEAP_SEX_AGE_RT/SDN.A{}?format=jsondata&detail=dataonly&lastNObservations=20",
            ".".repeat(dots)
        )
    };
    transport.ok(
        &candidate(3),
        json!({
            "data": {
                "structures": [{
                    "dimensions": {
                        "series": [
                            {"id": "REF_AREA", "values": [{"id": "SDN"}]},
                            {"id": "FREQ", "values": [{"id": "A"}]},
                            {"id": "SEX", "values": [{"id": "SEX_T"}, {"id": "SEX_F"}]},
                            {"id": "AGE", "values": [{"id": "AGE_YTHADULT_YGE15"}]}
                        ],
                        "observation": [{"id": "TIME_PERIOD", "values": [{"id": "2011"}, {"id": "2022"}]}]
                    }
                }],
                "dataSets": [{
                    "series": {
                        "0:0:1:0": {"observations": {"0": [19.6], "1": [21.3]}}
                    }
                }]
            }
        })
        .to_string(),
    );

    let query = IndicatorQuery::new("UNE_DEAP_SEX_AGE_RT").unwrap();
    let results = executor(&transport).ilo(&query).await;

    assert_eq!(
        transport.requests(),
        vec![candidate(1), candidate(2), candidate(3)]
    );
    assert_eq!(results.len(), 2);
    for row in results.rows() {
        assert_eq!(row.indicator, "UNE_DEAP_SEX_AGE_RT");
        assert_eq!(row.country, "SDN");
        assert_eq!(row.sex.as_deref(), Some("SEX_F"));
        assert_eq!(row.classif1.as_deref(), Some("AGE_YTHADULT_YGE15"));
    }
}

#[tokio::test]
async fn test_ilo_no_candidate_matches() {
    let transport = ScriptedTransport::new();
    let query = IndicatorQuery::new("DF_X").unwrap();

    let results = executor(&transport).ilo(&query).await;

    assert!(results.is_empty());
    assert_eq!(transport.requests().len(), 5);
    assert!(transport.requests()[0].contains("ILO,DF_X/SDN.A."));
}

#[tokio::test]
async fn test_who_failed_country_skipped() {
    let transport = ScriptedTransport::new();
    transport.ok(
        "https://ghoapi.azureedge.net/api/WHOSIS_000001?$filter=SpatialDim eq 'EGY'",
        json!({"value": [{"SpatialDim": "EGY", "TimeDim": 2019, "NumericValue": 71.8}]}).to_string(),
    );

    let query = IndicatorQuery::new("WHOSIS_000001")
        .unwrap()
        .with_countries(["SDN", "EGY"]);
    let results = executor(&transport).who(&query).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results.rows()[0].country, "EGY");
    assert_eq!(results.rows()[0].value, Some(71.8));
}

#[tokio::test]
async fn test_fao_uses_area_code() {
    let transport = ScriptedTransport::new();
    transport.ok(
        "https://fenixservices.fao.org/faostat/api/v1/en/data/QCL?area=238&output_type=objects&year_start=2018&year_end=2020",
        json!({"data": [
            {"Area": "Ethiopia", "Item": "Teff", "Element": "Production", "Year": "2020", "Value": "5500000", "Unit": "t"},
            {"Area": "Ethiopia", "Item": "Teff", "Element": "Yield", "Year": "2020", "Value": "18000", "Unit": "100 g/ha"}
        ]})
        .to_string(),
    );

    let query = FaoQuery::new("QCL", "production")
        .unwrap()
        .with_countries(["ET"])
        .with_years(YearFilter::between(2018, 2020));
    let results = executor(&transport).fao(&query).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results.rows()[0].value, Some(5_500_000.0));
}

#[tokio::test]
async fn test_catalogs_and_search() {
    let transport = ScriptedTransport::new();
    let wb_catalog = "https://api.worldbank.org/v2/indicator?format=json&per_page=1000&page=";
    transport
        .ok(
            &format!("{wb_catalog}1"),
            json!([{"page": 1, "pages": 2}, [{"id": "SP.POP.TOTL", "name": "Population, total"}]]).to_string(),
        )
        .ok(
            &format!("{wb_catalog}2"),
            json!([{"page": 2, "pages": 2}, [{"id": "SP.DYN.LE00.IN", "name": "Life expectancy at birth, total (years)"}]]).to_string(),
        )
        .ok(
            "https://api.worldbank.org/v2/indicator?format=json&per_page=1000&source=2",
            json!([{"page": 1, "pages": 20}, [{"id": "SP.DYN.LE00.IN", "name": "Life expectancy at birth, total (years)"}]]).to_string(),
        )
        .ok(
            "https://ghoapi.azureedge.net/api/Indicator",
            json!({"value": [
                {"IndicatorCode": "WHOSIS_000001", "IndicatorName": "Life expectancy at birth (years)", "Language": "EN"},
                {"IndicatorCode": "MDG_0000000026", "IndicatorName": "Maternal mortality ratio", "Language": "EN"}
            ]})
            .to_string(),
        );
    let executor = executor(&transport);

    let wb = executor.wb_indicators(Some("life")).await;
    assert_eq!(wb.len(), 1);

    let who = executor.who_indicators(None).await;
    assert_eq!(who.len(), 2);

    let hits = executor.search(&SearchQuery::new("Life Expectancy").unwrap()).await;
    let providers: Vec<_> = hits.rows().iter().map(|h| h.provider).collect();
    assert_eq!(providers, vec![ProviderId::WorldBank, ProviderId::Who]);

    // The WHO catalog is fetched once and reused by the search
    assert_eq!(transport.count("https://ghoapi.azureedge.net/api/Indicator"), 1);
}
