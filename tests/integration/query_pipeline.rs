//! End-to-end query tests over a scripted transport

use crate::support::{executor, ScriptedTransport};
use serde_json::json;
use sudan_stats::fetcher::TransportResponse;
use sudan_stats::query::{IndicatorQuery, DEFAULT_BATCH_SIZE};
use sudan_stats::YearFilter;

const WB_PAGE: &str =
    "https://api.worldbank.org/v2/country/SDN/indicator/SP.POP.TOTL?format=json&per_page=1000&page=";

fn wb_page(page: u32, pages: u32, years: &[&str]) -> String {
    let data: Vec<_> = years
        .iter()
        .map(|year| {
            json!({
                "indicator": {"id": "SP.POP.TOTL", "value": "Population, total"},
                "country": {"id": "SD", "value": "Sudan"},
                "date": year,
                "value": 1000
            })
        })
        .collect();
    json!([{"page": page, "pages": pages, "per_page": 1000, "total": years.len()}, data]).to_string()
}

#[tokio::test]
async fn test_worldbank_two_pages_in_order() {
    let transport = ScriptedTransport::new();
    transport
        .ok(&format!("{WB_PAGE}1"), wb_page(1, 2, &["2023", "2022"]))
        .ok(&format!("{WB_PAGE}2"), wb_page(2, 2, &["2021"]));
    let executor = executor(&transport);

    for input in ["SD", "SDN", "sdn"] {
        let query = IndicatorQuery::new("SP.POP.TOTL").unwrap().with_countries([input]);
        assert_eq!(query.countries(), vec!["SDN"]);

        let mut results = executor.worldbank(&query).await;
        let batch = results.next_batch(DEFAULT_BATCH_SIZE).unwrap();
        let years: Vec<_> = batch.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2023, 2022, 2021]);
        assert!(results.next_batch(DEFAULT_BATCH_SIZE).is_none());
    }

    // Later queries are served from the cache
    assert_eq!(
        transport.requests(),
        vec![format!("{WB_PAGE}1"), format!("{WB_PAGE}2")]
    );
}

#[tokio::test]
async fn test_worldbank_year_filter_in_every_page_url() {
    let transport = ScriptedTransport::new();
    transport
        .ok(&format!("{WB_PAGE}1&date=2010:2020"), wb_page(1, 2, &["2020"]))
        .ok(&format!("{WB_PAGE}2&date=2010:2020"), wb_page(2, 2, &["2019"]));

    let query = IndicatorQuery::new("SP.POP.TOTL")
        .unwrap()
        .with_years(YearFilter::between(2010, 2020));
    let results = executor(&transport).worldbank(&query).await;

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_worldbank_failed_page_keeps_earlier_rows() {
    let transport = ScriptedTransport::new();
    transport
        .ok(&format!("{WB_PAGE}1"), wb_page(1, 3, &["2023"]))
        .respond(&format!("{WB_PAGE}2"), TransportResponse::failed("connection reset"));

    let query = IndicatorQuery::new("SP.POP.TOTL").unwrap();
    let results = executor(&transport).worldbank(&query).await;

    assert_eq!(results.len(), 1);
    assert_eq!(transport.requests().len(), 2, "page 3 is never requested");
}

#[tokio::test]
async fn test_country_order_is_preserved() {
    let transport = ScriptedTransport::new();
    let egy = "https://api.worldbank.org/v2/country/EGY/indicator/SP.POP.TOTL?format=json&per_page=1000&page=1";
    transport
        .ok(&format!("{WB_PAGE}1"), wb_page(1, 1, &["2001"]))
        .ok(egy, wb_page(1, 1, &["2002"]));

    let query = IndicatorQuery::new("SP.POP.TOTL")
        .unwrap()
        .with_countries(["EG", "SD"]);
    let results = executor(&transport).worldbank(&query).await;

    let years: Vec<_> = results.rows().iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2002, 2001]);
}

#[tokio::test]
async fn test_failed_responses_are_not_cached() {
    let transport = ScriptedTransport::new();
    let url = format!("{WB_PAGE}1");
    transport.respond(&url, TransportResponse::status(503));

    let executor = executor(&transport);
    let query = IndicatorQuery::new("SP.POP.TOTL").unwrap();

    assert!(executor.worldbank(&query).await.is_empty());
    transport.ok(&url, wb_page(1, 1, &["2023"]));
    assert_eq!(executor.worldbank(&query).await.len(), 1);

    assert_eq!(transport.count(&url), 2);
    assert_eq!(executor.cache().len(), 1);
}

#[tokio::test]
async fn test_deserialized_query_uses_constructor_defaults() {
    let transport = ScriptedTransport::new();
    transport.ok(&format!("{WB_PAGE}1"), wb_page(1, 1, &["2023"]));

    let query: IndicatorQuery = serde_json::from_str(
        r#"{"indicator":"SP.POP.TOTL","countries":[],"years":{"start":-5,"end":null}}"#,
    )
    .unwrap();
    let results = executor(&transport).worldbank(&query).await;

    assert_eq!(results.len(), 1);
    assert_eq!(transport.requests(), vec![format!("{WB_PAGE}1")]);

    assert!(serde_json::from_str::<IndicatorQuery>(r#"{"indicator":""}"#).is_err());
}
