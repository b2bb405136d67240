pub mod filter;
pub mod sql;

pub use filter::FilterError;
pub use sql::SqlError;

/// The descriptor clause a failure was detected in.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Clause {
    From,
    Select,
    Where,
    Order,
    Group,
    Join(String),
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::From => write!(f, "from"),
            Clause::Select => write!(f, "select"),
            Clause::Where => write!(f, "where"),
            Clause::Order => write!(f, "order"),
            Clause::Group => write!(f, "group"),
            Clause::Join(alias) => write!(f, "join '{}'", alias),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    Filter { clause: Clause, error: FilterError },
    Sql(SqlError),
}

impl Error {
    pub fn in_clause(clause: Clause) -> impl FnOnce(FilterError) -> Error {
        move |error| Error::Filter { clause, error }
    }

    /// The underlying filter error, if this failure came from a filter or identifier.
    pub fn filter_error(&self) -> Option<&FilterError> {
        match self {
            Error::Filter { error, .. } => Some(error),
            Error::Sql(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Filter { clause, error } => write!(f, "filter error in {}: {}", clause, error),
            Error::Sql(e) => write!(f, "SQL error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Filter { error, .. } => Some(error),
            Error::Sql(e) => Some(e),
        }
    }
}

impl From<SqlError> for Error {
    fn from(err: SqlError) -> Self {
        Error::Sql(err)
    }
}
