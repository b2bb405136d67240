//! # Query Filter
//!
//! Compiles declarative, JSON-shaped query descriptors into parameterized SQL.
//!
//! ## Features
//!
//! - **Filter DSL**: column equality maps, operator objects, `$and`/`$or` groups and
//!   arrays of alternatives, nested to any depth
//! - **Bound Parameters**: every value is bound under a generated name; only validated
//!   identifiers are written into the SQL text
//! - **Joins**: `LEFT`/`INNER` joins with their own filter conditions and parameter namespace
//! - **Ordering, Grouping, Paging**: with checks that order columns are selected or grouped
//! - **Dialects**: PostgreSQL, MySQL, SQL Server and Oracle paging and placeholder styles
//! - **Execution Facade**: hand compiled queries to any async [`Executor`]
//!
//! ## Quick Start
//!
//! ```rust
//! use query_filter::query_from_json;
//! use serde_json::json;
//!
//! let query = query_from_json("users", &json!({
//!     "select": ["id", "name"],
//!     "where": { "age": { "$gte": 18 }, "status": { "$in": ["active", "pending"] } },
//!     "order": { "name": "ASC" },
//!     "take": 10
//! }))
//! .unwrap();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT users.id, users.name FROM users \
//!      WHERE users.age >= :0 AND users.status IN (:...1) ORDER BY users.name ASC LIMIT 10"
//! );
//! assert_eq!(query.params.len(), 2);
//! ```
//!
//! ## Filter Operators
//!
//! ### Comparison
//! - `$eq` `=`, `$ne` `!=`, `$gt` `>`, `$gte` `>=`, `$lt` `<`, `$lte` `<=`
//! - `$is` `IS`, `$not` `NOT`, `$isNot` (or `$notIs`) `IS NOT`
//!
//! ### Pattern Matching
//! - `$like`, `$notLike`, `$iLike`, `$notILike`; values are wrapped in `%` by default
//!
//! ### Regular Expressions
//! - `$regexp` `~`, `$notRegexp` `!~`, `$iRegexp` `~*`, `$notIRegexp` `!~*`
//!
//! ### Lists and Ranges
//! - `$in`, `$notIn` take a list and bind it as one spread parameter, `(:...name)`
//! - `$between`, `$notBetween` take exactly two values, bound as `name_start`/`name_end`
//!
//! ### Column Comparison
//! - `$col`, `$notCol`, `$gtCol`, `$gteCol`, `$ltCol`, `$lteCol` compare two columns
//!
//! ### Grouping
//! - `$and`, `$or` take an array of filters; a bare array is an OR of its elements
//!
//! ## Examples
//!
//! ### Boolean Groups
//! ```rust
//! use query_filter::{compile_where, RawFilter};
//! use serde_json::json;
//!
//! let filter = RawFilter::from(json!({
//!     "$or": [{ "role": "admin" }, { "age": { "$between": [18, 65] } }]
//! }));
//! let clause = compile_where(&filter, "u").unwrap();
//! assert_eq!(
//!     clause.sql,
//!     "(u.role = :0_0 OR u.age BETWEEN :0_1_start AND :0_1_end)"
//! );
//! ```
//!
//! ### Joins
//! ```rust
//! use query_filter::{build_query, JoinSpec, QueryDescriptor};
//! use serde_json::json;
//!
//! let descriptor = QueryDescriptor::new()
//!     .with_select(["id", "o.total"])
//!     .with_join(
//!         JoinSpec::inner("orders")
//!             .with_alias("o")
//!             .with_condition(json!({ "user_id": { "$col": "users.id" }, "status": "paid" })),
//!     )
//!     .with_filter(json!({ "o.total": { "$gt": 100 } }));
//!
//! let query = build_query("users", &descriptor).unwrap();
//! assert!(query.sql.contains("INNER JOIN orders o ON o.user_id = users.id AND o.status = :J_0_1"));
//! assert!(query.params.contains("J_0_1"));
//! assert!(query.params.contains("0"));
//! ```

pub mod ast;
pub mod error;
pub mod exec;
pub mod parser;
pub mod sql;

pub use ast::{
    Condition, Direction, FilterNode, FilterValue, GroupKind, JoinKind, JoinSpec, Operand,
    Operator, OperatorCategory, OperatorClause, OrderTerm, ParamValue, Predicate,
    QueryDescriptor, RawFilter,
};
pub use error::{Clause, Error, FilterError, SqlError};
pub use exec::{ExecuteError, Executor, FilterQuery, FindResult};
pub use parser::{normalize, parse_descriptor, NormalizeOptions};
pub use sql::{
    compile, validate_and_qualify, CompiledQuery, Dialect, ParamTable, PositionalQuery,
    QualifiedColumn, QueryBuilder, Scope, Statement, WhereClause,
};

/// Compiles a filter descriptor into a standalone boolean expression.
///
/// Columns are qualified with `alias`; no joins are known, so only `alias.column`
/// may be dotted. Pattern values get the default `%` wildcards.
///
/// # Examples
///
/// ```
/// use query_filter::{compile_where, RawFilter};
/// use serde_json::json;
///
/// let clause = compile_where(&RawFilter::from(json!({ "name": { "$like": "ann" } })), "users").unwrap();
/// assert_eq!(clause.sql, "users.name LIKE :0");
/// assert_eq!(clause.params.to_json(), json!({ "0": "%ann%" }));
/// ```
pub fn compile_where(filter: &RawFilter, alias: &str) -> Result<WhereClause, Error> {
    let wrap = || Error::in_clause(Clause::Where);
    let alias = parser::parse_identifier(alias).map_err(Error::in_clause(Clause::From))?;
    let node = normalize(filter, &NormalizeOptions::default()).map_err(wrap())?;
    compile(&node, &Scope::new(alias), "").map_err(wrap())
}

/// Builds a descriptor against `table` with the default alias, options and dialect.
///
/// # Examples
///
/// ```
/// use query_filter::{build_query, QueryDescriptor};
///
/// let descriptor = QueryDescriptor::new().with_select(["*"]).with_skip(20);
/// let query = build_query("users", &descriptor).unwrap();
/// assert_eq!(query.sql, "SELECT users.* FROM users OFFSET 20");
/// ```
pub fn build_query(table: &str, descriptor: &QueryDescriptor) -> Result<CompiledQuery, Error> {
    QueryBuilder::new(table)
        .build(descriptor)
        .map(|statement| statement.to_query())
}

/// Parses a JSON descriptor and builds it against `table`.
///
/// This is a convenience function that combines [`parse_descriptor`] and [`build_query`].
pub fn query_from_json(table: &str, descriptor: &serde_json::Value) -> Result<CompiledQuery, Error> {
    let descriptor = parse_descriptor(descriptor)?;
    build_query(table, &descriptor)
}
