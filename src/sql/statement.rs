use super::{Dialect, ParamTable, QualifiedColumn, WhereClause};
use crate::ast::{Direction, FilterValue, JoinKind, ParamValue};
use crate::error::SqlError;
use crate::parser::identifier;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{map, opt},
    multi::many0,
    IResult,
};
use serde::Serialize;

/// The execution-safe form of a statement: SQL with named placeholders and
/// the values bound to them.
///
/// Placeholders follow the `:name` convention; list parameters are spread
/// with `:...name` and must be expanded by the driver, or with
/// [`CompiledQuery::to_positional`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub sql: String,
    pub params: ParamTable,
    pub tables: Vec<String>,
}

/// SQL with positional placeholders and values in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalQuery {
    pub sql: String,
    pub values: Vec<FilterValue>,
}

enum Segment<'a> {
    Text(&'a str),
    Param { name: &'a str, spread: bool },
}

fn placeholder(i: &str) -> IResult<&str, Segment<'_>> {
    let (i, _) = char(':')(i)?;
    let (i, spread) = opt(tag("..."))(i)?;
    let (i, name) = identifier(i)?;
    Ok((
        i,
        Segment::Param {
            name,
            spread: spread.is_some(),
        },
    ))
}

fn text(i: &str) -> IResult<&str, Segment<'_>> {
    map(take_while1(|c| c != ':'), Segment::Text)(i)
}

fn segments(i: &str) -> IResult<&str, Vec<Segment<'_>>> {
    many0(alt((placeholder, text)))(i)
}

impl CompiledQuery {
    /// Rewrites named placeholders into the dialect's positional style.
    ///
    /// ```
    /// use query_filter::{build_query, QueryDescriptor};
    /// use query_filter::sql::Dialect;
    /// use serde_json::json;
    ///
    /// let descriptor = QueryDescriptor::new()
    ///     .with_select(["id"])
    ///     .with_filter(json!({ "id": { "$in": [1, 2] }, "name": "ann" }));
    /// let query = build_query("users", &descriptor).unwrap();
    /// let positional = query.to_positional(Dialect::Postgres).unwrap();
    ///
    /// assert_eq!(
    ///     positional.sql,
    ///     "SELECT users.id FROM users WHERE users.id IN ($1, $2) AND users.name = $3"
    /// );
    /// assert_eq!(positional.values.len(), 3);
    /// ```
    pub fn to_positional(&self, dialect: Dialect) -> Result<PositionalQuery, SqlError> {
        let (rest, segments) =
            segments(&self.sql).map_err(|e| SqlError::InvalidParameter(e.to_string()))?;
        if !rest.is_empty() {
            return Err(SqlError::InvalidParameter(format!(
                "unparseable placeholder at '{}'",
                rest
            )));
        }

        let mut sql = String::with_capacity(self.sql.len());
        let mut values = Vec::with_capacity(self.params.len());

        for segment in segments {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Param { name, spread } => match (self.params.get(name), spread) {
                    (Some(ParamValue::Single(value)), false) => {
                        values.push(value.clone());
                        sql.push_str(&dialect.placeholder(values.len()));
                    }
                    (Some(ParamValue::List(list)), true) => {
                        let mut placeholders = Vec::with_capacity(list.len());
                        for value in list {
                            values.push(value.clone());
                            placeholders.push(dialect.placeholder(values.len()));
                        }
                        sql.push_str(&placeholders.join(", "));
                    }
                    (Some(_), _) => {
                        return Err(SqlError::InvalidParameter(format!(
                            "parameter '{}' is bound with the wrong shape",
                            name
                        )))
                    }
                    (None, _) => {
                        return Err(SqlError::InvalidParameter(format!(
                            "unknown parameter '{}'",
                            name
                        )))
                    }
                },
            }
        }

        Ok(PositionalQuery { sql, values })
    }

    pub fn params_json(&self) -> serde_json::Value {
        self.params.to_json()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    pub condition: WhereClause,
}

impl JoinClause {
    fn to_sql(&self) -> String {
        let on = if self.condition.is_empty() {
            "1 = 1"
        } else {
            self.condition.sql.as_str()
        };
        format!(
            " {} {} ON {}",
            self.kind.sql_text(),
            table_ref(&self.table, &self.alias),
            on
        )
    }
}

fn table_ref(table: &str, alias: &str) -> String {
    if table == alias {
        table.to_string()
    } else {
        format!("{} {}", table, alias)
    }
}

/// A validated, fully assembled SELECT.
///
/// Built by [`QueryBuilder`](super::QueryBuilder); every identifier it holds
/// has been validated and every value is bound as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) table: String,
    pub(crate) alias: String,
    pub(crate) dialect: Dialect,
    pub(crate) select: Vec<QualifiedColumn>,
    pub(crate) filter: WhereClause,
    pub(crate) order: Vec<(QualifiedColumn, Direction)>,
    pub(crate) group: Vec<QualifiedColumn>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) take: Option<u64>,
    pub(crate) skip: Option<u64>,
}

impl Statement {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn select(&self) -> &[QualifiedColumn] {
        &self.select
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn take(&self) -> Option<u64> {
        self.take
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    /// The SQL text, for logging and debugging. Execute [`Statement::to_query`] instead.
    pub fn to_sql(&self) -> String {
        self.render(self.take, self.skip)
    }

    pub fn to_query(&self) -> CompiledQuery {
        self.compiled(self.to_sql())
    }

    /// Counts the rows matched by the filter, ignoring order and paging.
    pub fn count_query(&self) -> CompiledQuery {
        let sql = if self.group.is_empty() {
            format!("SELECT COUNT(*) AS count{}", self.body())
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM (SELECT {}{}{}) grouped",
                join_columns(&self.group),
                self.body(),
                self.group_clause()
            )
        };
        self.compiled(sql)
    }

    /// The same query limited to a single row.
    pub fn first_query(&self) -> CompiledQuery {
        self.compiled(self.render(Some(1), self.skip))
    }

    /// Main filter parameters followed by each join's, in declaration order.
    pub fn params(&self) -> ParamTable {
        let mut params = self.filter.params.clone();
        for join in &self.joins {
            params.merge(&join.condition.params);
        }
        params
    }

    pub fn tables(&self) -> Vec<String> {
        std::iter::once(self.table.clone())
            .chain(self.joins.iter().map(|j| j.table.clone()))
            .collect()
    }

    fn compiled(&self, sql: String) -> CompiledQuery {
        CompiledQuery {
            sql,
            params: self.params(),
            tables: self.tables(),
        }
    }

    fn render(&self, take: Option<u64>, skip: Option<u64>) -> String {
        let mut sql = format!("SELECT {}{}", join_columns(&self.select), self.body());
        sql.push_str(&self.group_clause());
        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction.sql_text()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        sql.push_str(&self.dialect.paging(take, skip, !self.order.is_empty()));
        sql
    }

    /// `FROM`, joins and `WHERE`.
    fn body(&self) -> String {
        let mut sql = format!(" FROM {}", table_ref(&self.table, &self.alias));
        for join in &self.joins {
            sql.push_str(&join.to_sql());
        }
        if !self.filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filter.sql);
        }
        sql
    }

    fn group_clause(&self) -> String {
        if self.group.is_empty() {
            String::new()
        } else {
            format!(" GROUP BY {}", join_columns(&self.group))
        }
    }
}

fn join_columns(columns: &[QualifiedColumn]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
