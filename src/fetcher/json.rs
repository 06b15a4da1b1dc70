//! Type-tolerant field extraction over `serde_json::Value`
//!
//! Every helper checks the JSON node type before use and returns `None` on
//! a mismatch, so decoders treat missing and mistyped fields alike.

use serde_json::Value;

use crate::fetcher::{FetcherError, FetcherResult};

/// Parse a page body as JSON
pub fn parse_body(body: &str) -> FetcherResult<Value> {
    serde_json::from_str(body).map_err(|e| FetcherError::ParseError(e.to_string()))
}

/// String field
pub fn str_field<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Owned string field
pub fn string_field(obj: &Value, key: &str) -> Option<String> {
    str_field(obj, key).map(str::to_string)
}

/// Owned string field, treating `""` as absent
pub fn non_empty_string_field(obj: &Value, key: &str) -> Option<String> {
    str_field(obj, key)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// String field nested one object deep (`obj[outer][inner]`)
pub fn nested_string_field(obj: &Value, outer: &str, inner: &str) -> Option<String> {
    obj.get(outer)
        .filter(|v| v.is_object())
        .and_then(|v| string_field(v, inner))
}

/// Integer or real JSON number as `f64`
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Integer or real number field
pub fn number_field(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(number)
}

/// Number field that also accepts numeric strings
///
/// A string that does not parse as a finite number is absent, never zero.
pub fn lenient_number_field(obj: &Value, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::String(s) => parse_f64(s),
        other => number(other),
    }
}

/// Number field truncated to `i64`, also accepting numeric strings
pub fn lenient_int_field(obj: &Value, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => parse_f64(s).map(|f| f as i64),
        _ => None,
    }
}

/// Year from an integer or numeric-string field
///
/// Missing or non-year fields give 0, as do strings without a leading
/// integer.
pub fn year_field(obj: &Value, key: &str) -> i32 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_i64().and_then(|y| i32::try_from(y).ok()).unwrap_or(0),
        Some(Value::String(s)) => leading_int(s).unwrap_or(0),
        _ => 0,
    }
}

/// Parse the leading integer of a string (`"2020"`, `"2020-Q1"`, `" 42x"`)
///
/// Leading whitespace and one sign are accepted; anything after the digits
/// is ignored. Returns `None` when no digit follows or on overflow.
pub fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}
