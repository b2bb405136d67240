use chrono::{DateTime, Utc};
use serde::Serialize;

/// An atomic comparable value bound into a parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Renders the value as pattern text, for wildcard wrapping.
    ///
    /// Only text, numbers and booleans have a textual form.
    pub fn to_pattern_text(&self) -> Option<String> {
        match self {
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::Integer(i) => Some(i.to_string()),
            FilterValue::Float(f) => Some(f.to_string()),
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Null | FilterValue::Date(_) | FilterValue::Binary(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FilterValue::Null => serde_json::Value::Null,
            FilterValue::Bool(b) => serde_json::Value::Bool(*b),
            FilterValue::Integer(i) => serde_json::Value::Number((*i).into()),
            FilterValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FilterValue::Text(s) => serde_json::Value::String(s.clone()),
            FilterValue::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            FilterValue::Binary(bytes) => serde_json::Value::Array(
                bytes
                    .iter()
                    .map(|b| serde_json::Value::Number((*b).into()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<i32> for FilterValue {
    fn from(i: i32) -> Self {
        FilterValue::Integer(i.into())
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Integer(i)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(d: DateTime<Utc>) -> Self {
        FilterValue::Date(d)
    }
}

impl From<Vec<u8>> for FilterValue {
    fn from(bytes: Vec<u8>) -> Self {
        FilterValue::Binary(bytes)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// A value bound to one named parameter.
///
/// `List` parameters are consumed with the `:...name` spread convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(FilterValue),
    List(Vec<FilterValue>),
}

impl ParamValue {
    pub fn as_single(&self) -> Option<&FilterValue> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            ParamValue::Single(_) => None,
            ParamValue::List(list) => Some(list.as_slice()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Single(v) => v.to_json(),
            ParamValue::List(list) => {
                serde_json::Value::Array(list.iter().map(FilterValue::to_json).collect())
            }
        }
    }
}
