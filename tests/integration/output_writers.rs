//! Writers over real result sets and files

use serde_json::Value;
use sudan_stats::output::{CsvRowWriter, JsonRowWriter, OutputWriter, RowWriter};
use sudan_stats::query::QueryResultSet;
use sudan_stats::{IloRow, TabularRow, WorldBankRow};
use tempfile::TempDir;

fn worldbank_rows() -> Vec<WorldBankRow> {
    vec![
        WorldBankRow {
            indicator_id: Some("SP.POP.TOTL".into()),
            indicator_name: Some("Population, total".into()),
            country: Some("SD".into()),
            country_name: Some("Sudan".into()),
            year: 2023,
            value: Some(48109006.0),
        },
        WorldBankRow {
            indicator_id: Some("SP.POP.TOTL".into()),
            indicator_name: Some("Population, total".into()),
            country: Some("SD".into()),
            country_name: Some("Sudan".into()),
            year: 2024,
            value: None,
        },
    ]
}

#[test]
fn test_csv_file_from_batches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wb.csv");

    let mut results = QueryResultSet::new(worldbank_rows());
    let mut writer = CsvRowWriter::<WorldBankRow>::create(&path).unwrap();
    while let Some(batch) = results.next_batch(1) {
        writer.write_rows(batch).unwrap();
    }
    assert_eq!(writer.rows_written(), 2);
    writer.close().unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, WorldBankRow::COLUMNS);

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(&records[0][5], "48109006");
    assert_eq!(&records[1][4], "2024");
    assert_eq!(&records[1][5], "", "absent value is an empty field");
}

#[test]
fn test_json_file_round_trips_nulls() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/ilo.json");

    let rows = vec![IloRow {
        indicator: "UNE_DEAP_SEX_AGE_RT".into(),
        country: "SDN".into(),
        sex: Some("SEX_T".into()),
        classif1: None,
        year: 2022,
        value: Some(21.3),
    }];

    let mut writer = JsonRowWriter::<IloRow>::create(&path).unwrap();
    writer.write_rows(&rows).unwrap();
    writer.close().unwrap();

    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &parsed[0];
    assert_eq!(first["classif1"], Value::Null);
    assert_eq!(first["year"], 2022);
    assert_eq!(first["value"], 21.3);
}
