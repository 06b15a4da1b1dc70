//! Unit tests for per-provider year filter encodings

use sudan_stats::filter::{
    append_fragment, encode_fao, encode_ilo, encode_unhcr, encode_who, encode_worldbank,
};
use sudan_stats::YearFilter;

#[test]
fn test_non_positive_years_are_unset() {
    assert_eq!(YearFilter::new(Some(0), Some(-5)), YearFilter::none());
    assert_eq!(YearFilter::new(Some(0), Some(2020)), YearFilter::until(2020));
}

#[test]
fn test_closed_range_every_provider() {
    let filter = YearFilter::between(2000, 2010);

    assert_eq!(encode_worldbank(&filter), "date=2000:2010");
    assert_eq!(encode_who(&filter), "$filter=TimeDim ge 2000 and TimeDim le 2010");
    assert_eq!(encode_fao(&filter), "year_start=2000&year_end=2010");
    assert_eq!(encode_unhcr(&filter), "yearFrom=2000&yearTo=2010");
    assert_eq!(encode_ilo(&filter), "startPeriod=2000&endPeriod=2010");
}

#[test]
fn test_open_ranges() {
    let from = YearFilter::from_year(2015);
    assert_eq!(encode_worldbank(&from), "date=2015:2100");
    assert_eq!(encode_who(&from), "$filter=TimeDim ge 2015");
    assert_eq!(encode_ilo(&from), "startPeriod=2015");

    let until = YearFilter::until(1999);
    assert_eq!(encode_worldbank(&until), "date=1900:1999");
    assert_eq!(encode_fao(&until), "year_end=1999");
}

#[test]
fn test_append_fragment_only_when_present() {
    let mut url = String::from("https://x.test/data?area=276");
    append_fragment(&mut url, &encode_fao(&YearFilter::none()));
    assert_eq!(url, "https://x.test/data?area=276");

    append_fragment(&mut url, &encode_fao(&YearFilter::from_year(2001)));
    assert_eq!(url, "https://x.test/data?area=276&year_start=2001");
}
