use crate::ast::{FilterValue, ParamValue};
use indexmap::IndexMap;
use serde::Serialize;

/// Named bound parameters, in binding order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ParamTable {
    values: IndexMap<String, ParamValue>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: FilterValue) {
        self.values.insert(name.into(), ParamValue::Single(value));
    }

    pub fn bind_list(&mut self, name: impl Into<String>, values: Vec<FilterValue>) {
        self.values.insert(name.into(), ParamValue::List(values));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Appends every parameter of `other`. Names are namespaced per compilation,
    /// so a clash means two fragments were compiled under the same namespace.
    pub fn merge(&mut self, other: &ParamTable) {
        for (name, value) in &other.values {
            if self.values.insert(name.clone(), value.clone()).is_some() {
                tracing::warn!(param = %name, "parameter overwritten while merging");
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
