use super::RawFilter;
use crate::error::SqlError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn sql_text(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    pub column: String,
    pub direction: Direction,
}

impl OrderTerm {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }

    pub fn asc(mut self) -> Self {
        self.direction = Direction::Asc;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Left,
    Inner,
}

impl JoinKind {
    pub fn sql_text(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Inner => "INNER JOIN",
        }
    }
}

impl FromStr for JoinKind {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(JoinKind::Left),
            "inner" => Ok(JoinKind::Inner),
            _ => Err(SqlError::UnknownJoinType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    pub condition: Option<RawFilter>,
}

impl JoinSpec {
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: None,
            condition: None,
        }
    }

    pub fn left(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, table)
    }

    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, table)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<RawFilter>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// The alias the join is registered under; defaults to the last segment
    /// of the table name.
    pub fn alias(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.table.rsplit('.').next().unwrap_or(&self.table),
        }
    }
}

/// A declarative query: what to select, how to filter, order, group, join and page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryDescriptor {
    pub select: Vec<String>,
    pub filter: Option<RawFilter>,
    pub order: Vec<OrderTerm>,
    pub group: Option<Vec<String>>,
    pub joins: Vec<JoinSpec>,
    pub take: Option<u64>,
    pub skip: Option<u64>,
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<RawFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_order(mut self, order: Vec<OrderTerm>) -> Self {
        self.order = order;
        self
    }

    pub fn with_group<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.group = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.as_ref().is_some_and(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_kind_from_str() {
        assert_eq!("LEFT".parse::<JoinKind>().unwrap(), JoinKind::Left);
        assert_eq!("inner".parse::<JoinKind>().unwrap(), JoinKind::Inner);
        assert_eq!(
            "outer".parse::<JoinKind>(),
            Err(SqlError::UnknownJoinType("outer".to_string()))
        );
    }

    #[test]
    fn test_join_alias_defaults_to_table() {
        let join = JoinSpec::left("orders");
        assert_eq!(join.alias(), "orders");
        assert_eq!(join.with_alias("o").alias(), "o");
        assert_eq!(JoinSpec::inner("public.orders").alias(), "orders");
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = QueryDescriptor::new()
            .with_select(["id", "name"])
            .with_filter(RawFilter::from(json!({ "id": 1 })))
            .with_order(vec![OrderTerm::new("id").desc()])
            .with_take(10);

        assert_eq!(descriptor.select, vec!["id", "name"]);
        assert!(descriptor.has_filter());
        assert!(!descriptor.has_joins());
        assert_eq!(descriptor.order[0].direction, Direction::Desc);
        assert_eq!(descriptor.take, Some(10));
        assert!(descriptor.skip.is_none());
    }

    #[test]
    fn test_empty_filter_is_not_a_filter() {
        let descriptor = QueryDescriptor::new().with_filter(RawFilter::from(json!({})));
        assert!(!descriptor.has_filter());
    }
}
