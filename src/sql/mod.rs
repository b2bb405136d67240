pub mod builder;
pub mod compiler;
pub mod dialect;
pub mod params;
pub mod scope;
pub mod statement;

pub use builder::QueryBuilder;
pub use compiler::{compile, WhereClause};
pub use dialect::Dialect;
pub use params::ParamTable;
pub use scope::{validate_and_qualify, QualifiedColumn, Scope};
pub use statement::{CompiledQuery, JoinClause, PositionalQuery, Statement};
