//! SDMX-JSON decoder
//!
//! Observations are addressed by colon-separated positional keys
//! (`"0:0:1"`) into ordered dimension value lists declared in the message
//! structure. Series keys index the series dimensions, observation keys index
//! the observation dimensions (usually just `TIME_PERIOD`).
//!
//! Two schema generations are accepted: `dataSets`/`structure` at the root
//! (SDMX-JSON 1.0) or wrapped in `data` with `structures[0]` (2.0).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::fetcher::json::{leading_int, number, parse_body, str_field};
use crate::fetcher::{FetcherError, FetcherResult, PageMeta};
use crate::IloRow;

/// Sex breakdown dimension id
pub const SEX_DIMENSION: &str = "SEX";
/// Time dimension id
pub const TIME_DIMENSION: &str = "TIME_PERIOD";
/// Classification dimension ids, in lookup order
pub const CLASSIFICATION_DIMENSIONS: [&str; 2] = ["AGE", "CLASSIF1"];

/// Dimension id -> (position in key, ordered values), built once per message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionIndex {
    dimensions: HashMap<String, (usize, Vec<String>)>,
}

impl DimensionIndex {
    /// Build from a structure's dimension array
    ///
    /// Each value is labelled by its `id`, else its `name`, else `""`.
    /// Entries without a string `id` keep their position but cannot be looked up.
    pub fn from_dimensions(dimensions: Option<&Value>) -> Self {
        let mut index = HashMap::new();

        let Some(list) = dimensions.and_then(Value::as_array) else {
            return Self { dimensions: index };
        };

        for (position, dimension) in list.iter().enumerate() {
            let Some(id) = str_field(dimension, "id") else {
                continue;
            };
            let values = dimension
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(value_label).collect())
                .unwrap_or_default();
            index.insert(id.to_string(), (position, values));
        }

        Self { dimensions: index }
    }

    /// Number of addressable dimensions
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// True when no dimension was declared
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// True when the dimension is declared
    pub fn contains(&self, id: &str) -> bool {
        self.dimensions.contains_key(id)
    }

    /// Value of dimension `id` for a parsed key
    ///
    /// Returns `""` when the dimension is not declared, the key is too short
    /// or the index is out of range.
    pub fn resolve(&self, id: &str, key: &[usize]) -> &str {
        self.dimensions
            .get(id)
            .and_then(|(position, values)| key.get(*position).and_then(|i| values.get(*i)))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// First non-empty value among synonymous dimension ids
    pub fn resolve_first(&self, ids: &[&str], key: &[usize]) -> &str {
        ids.iter()
            .map(|id| self.resolve(id, key))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

fn value_label(value: &Value) -> String {
    str_field(value, "id")
        .or_else(|| str_field(value, "name"))
        .unwrap_or("")
        .to_string()
}

/// Split a positional key on `:`; a malformed segment becomes index 0
pub fn parse_key(key: &str) -> Vec<usize> {
    key.split(':')
        .map(|segment| segment.trim().parse().unwrap_or(0))
        .collect()
}

/// Dimension indexes of one message
#[derive(Debug, Clone, Default)]
pub struct MessageStructure {
    /// Series axis
    pub series: DimensionIndex,
    /// Observation axis
    pub observation: DimensionIndex,
}

impl MessageStructure {
    /// Read `structure.dimensions.{series,observation}`
    pub fn from_structure(structure: Option<&Value>) -> Self {
        let dimensions = structure.and_then(|s| s.get("dimensions"));
        Self {
            series: DimensionIndex::from_dimensions(dimensions.and_then(|d| d.get("series"))),
            observation: DimensionIndex::from_dimensions(
                dimensions.and_then(|d| d.get("observation")),
            ),
        }
    }
}

/// Locate the first data set, at the root or under `data`
///
/// A root `dataSets` that is not a non-empty array falls through to
/// `data.dataSets`.
fn first_data_set(root: &Value) -> FetcherResult<&Value> {
    let data_sets = root
        .get("dataSets")
        .and_then(Value::as_array)
        .filter(|sets| !sets.is_empty())
        .or_else(|| {
            root.get("data")
                .and_then(|d| d.get("dataSets"))
                .and_then(Value::as_array)
        })
        .ok_or_else(|| FetcherError::InvalidResponse("missing dataSets array".to_string()))?;

    data_sets
        .first()
        .ok_or_else(|| FetcherError::InvalidResponse("empty dataSets array".to_string()))
}

/// Locate the structure: root `structure`, `data.structures[0]`, or `data.structure`
fn find_structure(root: &Value) -> Option<&Value> {
    if let Some(structure) = root.get("structure") {
        return Some(structure);
    }
    let data = root.get("data")?;
    data.get("structures")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
        .or_else(|| data.get("structure"))
}

/// First element of an observation value array, when numeric
fn observation_value(value: &Value) -> Option<f64> {
    value.as_array().and_then(|v| v.first()).and_then(number)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Decode one SDMX-JSON message into ILO rows
///
/// `indicator` and `country` come from the request: the flat shape carries
/// no series key to resolve them from, and the series shape is requested
/// per country anyway. Only observations with a numeric value become rows.
///
/// # Errors
/// `ParseError` for invalid JSON, `InvalidResponse` when `dataSets` is
/// missing or empty. Bad keys or values only drop the observation.
pub fn decode_page(
    body: &str,
    indicator: &str,
    country: &str,
    rows: &mut Vec<IloRow>,
) -> FetcherResult<PageMeta> {
    let root = parse_body(body)?;
    let data_set = first_data_set(&root)?;
    let structure = MessageStructure::from_structure(find_structure(&root));

    if let Some(series) = data_set.get("series").and_then(Value::as_object) {
        for (series_key, series_value) in series {
            let key = parse_key(series_key);
            let sex = non_empty(structure.series.resolve(SEX_DIMENSION, &key));
            let classif1 =
                non_empty(structure.series.resolve_first(&CLASSIFICATION_DIMENSIONS, &key));

            let Some(observations) = series_value.get("observations").and_then(Value::as_object)
            else {
                continue;
            };

            for (obs_key, obs_value) in observations {
                let Some(value) = observation_value(obs_value) else {
                    continue;
                };
                let obs = parse_key(obs_key);
                rows.push(IloRow {
                    indicator: indicator.to_string(),
                    country: country.to_string(),
                    sex: sex.clone(),
                    classif1: classif1.clone(),
                    year: leading_int(structure.observation.resolve(TIME_DIMENSION, &obs))
                        .unwrap_or(0),
                    value: Some(value),
                });
            }
        }
    } else if let Some(observations) = data_set.get("observations").and_then(Value::as_object) {
        decode_flat(observations, &structure.observation, indicator, country, rows);
    }

    Ok(PageMeta::default())
}

/// Flat shape: keys index the observation dimensions only
fn decode_flat(
    observations: &Map<String, Value>,
    dimensions: &DimensionIndex,
    indicator: &str,
    country: &str,
    rows: &mut Vec<IloRow>,
) {
    for (obs_key, obs_value) in observations {
        let Some(value) = observation_value(obs_value) else {
            continue;
        };
        let key = parse_key(obs_key);
        rows.push(IloRow {
            indicator: indicator.to_string(),
            country: country.to_string(),
            sex: non_empty(dimensions.resolve(SEX_DIMENSION, &key)),
            classif1: non_empty(dimensions.resolve_first(&CLASSIFICATION_DIMENSIONS, &key)),
            year: leading_int(dimensions.resolve(TIME_DIMENSION, &key)).unwrap_or(0),
            value: Some(value),
        });
    }
}
