use crate::ast::{Direction, JoinKind, JoinSpec, OrderTerm, QueryDescriptor, RawFilter};
use crate::error::{Error, SqlError};
use serde_json::{Map, Value};

/// Parses a JSON query descriptor.
///
/// Recognized keys are `select`, `where`, `order`, `group`, `joins`, `take` and
/// `skip`; anything else is ignored. Filters are kept raw here and validated
/// when the query is built.
///
/// # Examples
///
/// ```
/// use query_filter::parser::parse_descriptor;
/// use serde_json::json;
///
/// let descriptor = parse_descriptor(&json!({
///     "select": ["id", "name"],
///     "where": { "age": { "$gte": 18 } },
///     "order": { "name": "DESC" },
///     "take": 10
/// }))
/// .unwrap();
///
/// assert_eq!(descriptor.select, vec!["id", "name"]);
/// assert_eq!(descriptor.take, Some(10));
/// ```
pub fn parse_descriptor(value: &Value) -> Result<QueryDescriptor, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, got {}", json_kind(value))))?;

    let mut descriptor = QueryDescriptor::new();
    let mut has_select = false;

    for (key, value) in object {
        match key.as_str() {
            "select" => {
                descriptor.select = parse_string_list("select", value)?;
                has_select = true;
            }
            "where" => {
                if !value.is_null() {
                    descriptor.filter = Some(RawFilter::from(value.clone()));
                }
            }
            "order" => descriptor.order = parse_order(value)?,
            "group" => descriptor.group = Some(parse_string_list("group", value)?),
            "joins" => descriptor.joins = parse_joins(value)?,
            "take" => descriptor.take = Some(parse_paging("take", value)?),
            "skip" => descriptor.skip = Some(parse_paging("skip", value)?),
            other => {
                tracing::debug!(key = %other, "ignoring unknown descriptor key");
            }
        }
    }

    if !has_select || descriptor.select.is_empty() {
        return Err(SqlError::SelectRequired.into());
    }

    Ok(descriptor)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Sql(SqlError::InvalidDescriptor(message.into()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_string_list(key: &str, value: &Value) -> Result<Vec<String>, Error> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("{} must be an array, got {}", key, json_kind(value))))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                invalid(format!(
                    "{} entries must be strings, got {}",
                    key,
                    json_kind(item)
                ))
            })
        })
        .collect()
}

fn parse_order(value: &Value) -> Result<Vec<OrderTerm>, Error> {
    let entries = value
        .as_object()
        .ok_or_else(|| invalid(format!("order must be an object, got {}", json_kind(value))))?;

    entries
        .iter()
        .map(|(column, direction)| {
            let direction = parse_direction(column, direction)?;
            Ok(OrderTerm {
                column: column.clone(),
                direction,
            })
        })
        .collect()
}

/// Accepts `asc`/`desc` in either case, `1`/`-1` and their string forms.
pub fn parse_direction(column: &str, value: &Value) -> Result<Direction, SqlError> {
    let direction = match value {
        Value::String(s) => match s.as_str() {
            "asc" | "ASC" | "1" => Some(Direction::Asc),
            "desc" | "DESC" | "-1" => Some(Direction::Desc),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(Direction::Asc),
            Some(-1) => Some(Direction::Desc),
            _ => None,
        },
        _ => None,
    };

    direction.ok_or_else(|| SqlError::InvalidOrderDirection {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_paging(clause: &'static str, value: &Value) -> Result<u64, Error> {
    value.as_u64().ok_or_else(|| {
        SqlError::InvalidPaging {
            clause,
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_joins(value: &Value) -> Result<Vec<JoinSpec>, Error> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("joins must be an array, got {}", json_kind(value))))?;

    items
        .iter()
        .map(|item| {
            item.as_object()
                .ok_or_else(|| invalid(format!("join must be an object, got {}", json_kind(item))))
                .and_then(parse_join)
        })
        .collect()
}

fn parse_join(entry: &Map<String, Value>) -> Result<JoinSpec, Error> {
    let table = required_str(entry, "table")?;
    let kind: JoinKind = required_str(entry, "type")?.parse()?;

    let mut join = JoinSpec::new(kind, table);
    match entry.get("alias") {
        None | Some(Value::Null) => {}
        Some(Value::String(alias)) => join.alias = Some(alias.clone()),
        Some(other) => {
            return Err(invalid(format!(
                "join alias must be a string, got {}",
                json_kind(other)
            )))
        }
    }

    if let Some(condition) = entry.get("condition").filter(|c| !c.is_null()) {
        join.condition = Some(RawFilter::from(condition.clone()));
    }

    Ok(join)
}

fn required_str<'a>(entry: &'a Map<String, Value>, key: &str) -> Result<&'a str, Error> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("join requires a string '{}'", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = parse_descriptor(&json!({
            "select": ["id", "o.total"],
            "where": { "id": { "$gt": 1 } },
            "order": { "id": "desc", "o.total": 1 },
            "group": ["id"],
            "joins": [
                { "type": "left", "table": "orders", "alias": "o", "condition": { "status": "paid" } }
            ],
            "take": 5,
            "skip": 10
        }))
        .unwrap();

        assert_eq!(descriptor.select, vec!["id", "o.total"]);
        assert!(descriptor.has_filter());
        assert_eq!(descriptor.order.len(), 2);
        assert_eq!(descriptor.order[0].direction, Direction::Desc);
        assert_eq!(descriptor.order[1].direction, Direction::Asc);
        assert_eq!(descriptor.group, Some(vec!["id".to_string()]));
        assert_eq!(descriptor.joins[0].kind, JoinKind::Left);
        assert_eq!(descriptor.joins[0].alias(), "o");
        assert!(descriptor.joins[0].condition.is_some());
        assert_eq!(descriptor.take, Some(5));
        assert_eq!(descriptor.skip, Some(10));
    }

    #[test]
    fn test_parse_missing_select() {
        let result = parse_descriptor(&json!({ "where": { "id": 1 } }));
        assert_eq!(result, Err(Error::Sql(SqlError::SelectRequired)));

        let result = parse_descriptor(&json!({ "select": [] }));
        assert_eq!(result, Err(Error::Sql(SqlError::SelectRequired)));
    }

    #[test]
    fn test_parse_select_not_array() {
        let result = parse_descriptor(&json!({ "select": "id" }));
        assert!(matches!(
            result,
            Err(Error::Sql(SqlError::InvalidDescriptor(_)))
        ));
    }

    #[test]
    fn test_parse_unknown_keys_ignored() {
        let descriptor = parse_descriptor(&json!({ "select": ["id"], "cache": true })).unwrap();
        assert_eq!(descriptor.select, vec!["id"]);
    }

    #[test]
    fn test_parse_invalid_paging() {
        for bad in [json!(-1), json!("10"), json!(1.5)] {
            let result = parse_descriptor(&json!({ "select": ["id"], "take": bad.clone() }));
            assert_eq!(
                result,
                Err(Error::Sql(SqlError::InvalidPaging {
                    clause: "take",
                    value: bad.to_string(),
                }))
            );
        }
    }

    #[test]
    fn test_parse_directions() {
        let accepted = [
            (json!("asc"), Direction::Asc),
            (json!("ASC"), Direction::Asc),
            (json!(1), Direction::Asc),
            (json!("1"), Direction::Asc),
            (json!("desc"), Direction::Desc),
            (json!("DESC"), Direction::Desc),
            (json!(-1), Direction::Desc),
            (json!("-1"), Direction::Desc),
        ];
        for (value, expected) in accepted {
            assert_eq!(parse_direction("id", &value), Ok(expected));
        }
        assert!(matches!(
            parse_direction("id", &json!("up")),
            Err(SqlError::InvalidOrderDirection { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_join_type() {
        let result = parse_descriptor(&json!({
            "select": ["id"],
            "joins": [{ "type": "outer", "table": "orders" }]
        }));
        assert_eq!(
            result,
            Err(Error::Sql(SqlError::UnknownJoinType("outer".to_string())))
        );
    }
}
