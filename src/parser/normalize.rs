use crate::ast::{
    Condition, FilterNode, FilterValue, GroupKind, Operand, Operator, OperatorCategory,
    OperatorClause, Predicate, RawFilter,
};
use crate::error::FilterError;
use indexmap::IndexMap;
use serde::Deserialize;

/// Wildcards wrapped around every pattern-operator value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub prefix: String,
    pub suffix: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            prefix: "%".to_string(),
            suffix: "%".to_string(),
        }
    }
}

impl NormalizeOptions {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// No wildcards: pattern values are bound exactly as given.
    pub fn exact() -> Self {
        Self::new("", "")
    }
}

/// Normalizes a raw where descriptor into a typed filter tree.
///
/// An empty root object or array yields an empty node, which compiles to no
/// WHERE clause at all.
///
/// # Examples
///
/// ```
/// use query_filter::ast::{FilterNode, RawFilter};
/// use query_filter::parser::{normalize, NormalizeOptions};
/// use serde_json::json;
///
/// let raw = RawFilter::from(json!({ "name": { "$like": "ann" } }));
/// let node = normalize(&raw, &NormalizeOptions::default()).unwrap();
/// assert!(matches!(node, FilterNode::Conditions(ref c) if c.len() == 1));
/// ```
pub fn normalize(raw: &RawFilter, options: &NormalizeOptions) -> Result<FilterNode, FilterError> {
    if raw.is_empty() {
        return Ok(FilterNode::Conditions(Vec::new()));
    }
    Normalizer { options }.node(raw)
}

struct Normalizer<'a> {
    options: &'a NormalizeOptions,
}

impl Normalizer<'_> {
    fn node(&self, raw: &RawFilter) -> Result<FilterNode, FilterError> {
        match raw {
            RawFilter::Object(map) if map.is_empty() => {
                Err(FilterError::malformed("empty filter object"))
            }
            RawFilter::List(items) if items.is_empty() => {
                Err(FilterError::malformed("empty filter array"))
            }
            RawFilter::Object(map) => self.conditions(map).map(FilterNode::Conditions),
            RawFilter::List(items) => items
                .iter()
                .map(|item| self.node(item))
                .collect::<Result<Vec<_>, _>>()
                .map(FilterNode::Alternatives),
            RawFilter::Scalar(value) => Err(FilterError::malformed(format!(
                "expected an object or array, got scalar {:?}",
                value
            ))),
        }
    }

    fn conditions(&self, map: &IndexMap<String, RawFilter>) -> Result<Vec<Condition>, FilterError> {
        map.iter()
            .map(|(key, value)| self.condition(key, value))
            .collect()
    }

    fn condition(&self, key: &str, value: &RawFilter) -> Result<Condition, FilterError> {
        if key.starts_with('$') {
            let operator: Operator = key.parse()?;
            return match operator {
                Operator::And => self.group(GroupKind::And, value),
                Operator::Or => self.group(GroupKind::Or, value),
                _ => Err(FilterError::malformed(format!(
                    "operator {} used where a column was expected",
                    operator
                ))),
            };
        }

        let predicate = match value {
            RawFilter::Scalar(v) => Predicate::Equals(v.clone()),
            RawFilter::List(_) => {
                return Err(FilterError::malformed(format!(
                    "column '{}' paired with an array; use $in for value lists",
                    key
                )))
            }
            RawFilter::Object(ops) => Predicate::Operators(self.operator_clauses(key, ops)?),
        };
        Ok(Condition::column(key, predicate))
    }

    fn group(&self, kind: GroupKind, value: &RawFilter) -> Result<Condition, FilterError> {
        let operator = kind.operator();
        match value {
            RawFilter::List(items) if items.is_empty() => Err(FilterError::malformed(format!(
                "{} requires at least one child",
                operator
            ))),
            RawFilter::List(items) => {
                let children = items
                    .iter()
                    .map(|item| self.node(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Condition::Group { kind, children })
            }
            other => Err(FilterError::malformed(format!(
                "{} expects an array of filters, got {}",
                operator,
                other.kind()
            ))),
        }
    }

    fn operator_clauses(
        &self,
        column: &str,
        ops: &IndexMap<String, RawFilter>,
    ) -> Result<Vec<OperatorClause>, FilterError> {
        if ops.is_empty() {
            return Err(FilterError::malformed(format!(
                "empty operator object on column '{}'",
                column
            )));
        }

        ops.iter()
            .map(|(token, value)| {
                if !token.starts_with('$') {
                    return Err(FilterError::UnknownOperator(token.clone()));
                }
                let operator: Operator = token.parse()?;
                let operand = self.operand(column, operator, value)?;
                Ok(OperatorClause::new(operator, operand))
            })
            .collect()
    }

    fn operand(
        &self,
        column: &str,
        operator: Operator,
        value: &RawFilter,
    ) -> Result<Operand, FilterError> {
        let mismatch = |expected: &str| {
            FilterError::malformed(format!(
                "{} on '{}' expects {}, got {}",
                operator,
                column,
                expected,
                value.kind()
            ))
        };

        match (operator.category(), value) {
            (OperatorCategory::Comparison | OperatorCategory::Regex, RawFilter::Scalar(v)) => {
                Ok(Operand::Value(v.clone()))
            }
            (OperatorCategory::Pattern, RawFilter::Scalar(v)) => v
                .to_pattern_text()
                .map(|text| {
                    Operand::Value(FilterValue::Text(format!(
                        "{}{}{}",
                        self.options.prefix, text, self.options.suffix
                    )))
                })
                .ok_or_else(|| mismatch("text, a number or a boolean")),
            (OperatorCategory::Range, RawFilter::List(items)) => {
                let values = scalars(items).ok_or_else(|| mismatch("two scalar values"))?;
                match <[FilterValue; 2]>::try_from(values) {
                    Ok([start, end]) => Ok(Operand::Range(start, end)),
                    Err(values) => Err(FilterError::RangeArity {
                        column: column.to_string(),
                        operator: operator.token().to_string(),
                        found: values.len(),
                    }),
                }
            }
            (OperatorCategory::Membership, RawFilter::List(items)) if !items.is_empty() => {
                scalars(items)
                    .map(Operand::List)
                    .ok_or_else(|| mismatch("a list of scalar values"))
            }
            (OperatorCategory::ColumnCompare, RawFilter::Scalar(FilterValue::Text(other))) => {
                Ok(Operand::Column(other.clone()))
            }
            (OperatorCategory::BooleanGroup, _) => Err(FilterError::malformed(format!(
                "{} is not allowed inside the operator object of '{}'",
                operator, column
            ))),
            (OperatorCategory::Comparison | OperatorCategory::Regex, _) => {
                Err(mismatch("a scalar value"))
            }
            (OperatorCategory::Pattern, _) => Err(mismatch("text, a number or a boolean")),
            (OperatorCategory::Range, _) => Err(mismatch("two scalar values")),
            (OperatorCategory::Membership, _) => Err(mismatch("a non-empty list of values")),
            (OperatorCategory::ColumnCompare, _) => Err(mismatch("a column name")),
        }
    }
}

fn scalars(items: &[RawFilter]) -> Option<Vec<FilterValue>> {
    items
        .iter()
        .map(|item| match item {
            RawFilter::Scalar(v) => Some(v.clone()),
            _ => None,
        })
        .collect()
}
