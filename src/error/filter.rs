use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum FilterError {
    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("identifier contains unsupported characters: {0}")]
    InjectionRisk(String),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("join alias '{alias}' is not declared (in '{identifier}')")]
    UnknownJoinAlias { alias: String, identifier: String },

    #[error("{operator} on '{column}' expects exactly 2 values, got {found}")]
    RangeArity {
        column: String,
        operator: String,
        found: usize,
    },
}

impl FilterError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        FilterError::MalformedFilter(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_unknown_operator() {
        let err = FilterError::UnknownOperator("$eqq".to_string());
        assert_eq!(err.to_string(), "unknown operator: $eqq");
    }

    #[test]
    fn test_filter_error_unknown_join_alias() {
        let err = FilterError::UnknownJoinAlias {
            alias: "orders".to_string(),
            identifier: "orders.total".to_string(),
        };
        assert!(err.to_string().contains("'orders'"));
        assert!(err.to_string().contains("orders.total"));
    }

    #[test]
    fn test_filter_error_range_arity() {
        let err = FilterError::RangeArity {
            column: "age".to_string(),
            operator: "$between".to_string(),
            found: 3,
        };
        assert!(err.to_string().contains("exactly 2"));
    }

    #[test]
    fn test_filter_error_clone() {
        let err = FilterError::InjectionRisk("a\"b".to_string());
        assert_eq!(err.clone(), err);
    }
}
