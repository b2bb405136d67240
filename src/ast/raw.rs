use super::FilterValue;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A caller-supplied filter descriptor, before normalization.
///
/// Mirrors a JSON document, with extra scalar kinds (dates, blobs) that only
/// Rust callers can produce. Object key order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFilter {
    Scalar(FilterValue),
    List(Vec<RawFilter>),
    Object(IndexMap<String, RawFilter>),
}

impl RawFilter {
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<RawFilter>,
        I: IntoIterator<Item = (K, V)>,
    {
        RawFilter::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<RawFilter>,
        I: IntoIterator<Item = V>,
    {
        RawFilter::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawFilter::Scalar(_) => false,
            RawFilter::List(items) => items.is_empty(),
            RawFilter::Object(map) => map.is_empty(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            RawFilter::Scalar(_) => "scalar",
            RawFilter::List(_) => "array",
            RawFilter::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for RawFilter {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawFilter::Scalar(FilterValue::Null),
            serde_json::Value::Bool(b) => RawFilter::Scalar(FilterValue::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => RawFilter::Scalar(FilterValue::Integer(i)),
                None => RawFilter::Scalar(n.as_f64().map(FilterValue::Float).unwrap_or(FilterValue::Null)),
            },
            serde_json::Value::String(s) => RawFilter::Scalar(FilterValue::Text(s)),
            serde_json::Value::Array(items) => {
                RawFilter::List(items.into_iter().map(RawFilter::from).collect())
            }
            serde_json::Value::Object(map) => RawFilter::Object(
                map.into_iter()
                    .map(|(k, v)| (k, RawFilter::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for RawFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(RawFilter::from)
    }
}

impl From<FilterValue> for RawFilter {
    fn from(value: FilterValue) -> Self {
        RawFilter::Scalar(value)
    }
}

impl From<&str> for RawFilter {
    fn from(s: &str) -> Self {
        RawFilter::Scalar(s.into())
    }
}

impl From<String> for RawFilter {
    fn from(s: String) -> Self {
        RawFilter::Scalar(s.into())
    }
}

impl From<i64> for RawFilter {
    fn from(i: i64) -> Self {
        RawFilter::Scalar(i.into())
    }
}

impl From<i32> for RawFilter {
    fn from(i: i32) -> Self {
        RawFilter::Scalar(i.into())
    }
}

impl From<bool> for RawFilter {
    fn from(b: bool) -> Self {
        RawFilter::Scalar(b.into())
    }
}

impl From<f64> for RawFilter {
    fn from(f: f64) -> Self {
        RawFilter::Scalar(f.into())
    }
}

impl<T: Into<RawFilter>> From<Vec<T>> for RawFilter {
    fn from(items: Vec<T>) -> Self {
        RawFilter::list(items)
    }
}
