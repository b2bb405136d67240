use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SqlError {
    #[error("empty table name")]
    EmptyTableName,

    #[error("select is required and must name at least one column")]
    SelectRequired,

    #[error("order column '{column}' must also appear in {expected_in}")]
    AmbiguousOrderGroup {
        column: String,
        expected_in: &'static str,
    },

    #[error("unknown join type: {0}")]
    UnknownJoinType(String),

    #[error("join alias declared more than once: {0}")]
    DuplicateJoinAlias(String),

    #[error("{clause} must be a non-negative integer, got {value}")]
    InvalidPaging { clause: &'static str, value: String },

    #[error("invalid order direction for '{column}': {value}")]
    InvalidOrderDirection { column: String, value: String },

    #[error("invalid query descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
