use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every operator token the filter DSL understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    Not,
    IsNot,
    Like,
    NotLike,
    ILike,
    NotILike,
    Between,
    NotBetween,
    In,
    NotIn,
    Regexp,
    NotRegexp,
    IRegexp,
    NotIRegexp,
    Col,
    NotCol,
    GtCol,
    GteCol,
    LtCol,
    LteCol,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCategory {
    Comparison,
    Pattern,
    Range,
    Membership,
    Regex,
    ColumnCompare,
    BooleanGroup,
}

impl Operator {
    pub const ALL: [Operator; 29] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Is,
        Operator::Not,
        Operator::IsNot,
        Operator::Like,
        Operator::NotLike,
        Operator::ILike,
        Operator::NotILike,
        Operator::Between,
        Operator::NotBetween,
        Operator::In,
        Operator::NotIn,
        Operator::Regexp,
        Operator::NotRegexp,
        Operator::IRegexp,
        Operator::NotIRegexp,
        Operator::Col,
        Operator::NotCol,
        Operator::GtCol,
        Operator::GteCol,
        Operator::LtCol,
        Operator::LteCol,
        Operator::And,
        Operator::Or,
    ];

    /// The DSL token, e.g. `$gte`.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Is => "$is",
            Operator::Not => "$not",
            Operator::IsNot => "$isNot",
            Operator::Like => "$like",
            Operator::NotLike => "$notLike",
            Operator::ILike => "$iLike",
            Operator::NotILike => "$notILike",
            Operator::Between => "$between",
            Operator::NotBetween => "$notBetween",
            Operator::In => "$in",
            Operator::NotIn => "$notIn",
            Operator::Regexp => "$regexp",
            Operator::NotRegexp => "$notRegexp",
            Operator::IRegexp => "$iRegexp",
            Operator::NotIRegexp => "$notIRegexp",
            Operator::Col => "$col",
            Operator::NotCol => "$notCol",
            Operator::GtCol => "$gtCol",
            Operator::GteCol => "$gteCol",
            Operator::LtCol => "$ltCol",
            Operator::LteCol => "$lteCol",
            Operator::And => "$and",
            Operator::Or => "$or",
        }
    }

    /// The SQL operator text. Persisted queries depend on this mapping; keep it stable.
    pub fn sql_text(self) -> &'static str {
        match self {
            Operator::Eq | Operator::Col => "=",
            Operator::Ne | Operator::NotCol => "!=",
            Operator::Gt | Operator::GtCol => ">",
            Operator::Gte | Operator::GteCol => ">=",
            Operator::Lt | Operator::LtCol => "<",
            Operator::Lte | Operator::LteCol => "<=",
            Operator::Is => "IS",
            Operator::Not => "NOT",
            Operator::IsNot => "IS NOT",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Regexp => "~",
            Operator::NotRegexp => "!~",
            Operator::IRegexp => "~*",
            Operator::NotIRegexp => "!~*",
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }

    pub fn category(self) -> OperatorCategory {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Is
            | Operator::Not
            | Operator::IsNot => OperatorCategory::Comparison,
            Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike => {
                OperatorCategory::Pattern
            }
            Operator::Between | Operator::NotBetween => OperatorCategory::Range,
            Operator::In | Operator::NotIn => OperatorCategory::Membership,
            Operator::Regexp | Operator::NotRegexp | Operator::IRegexp | Operator::NotIRegexp => {
                OperatorCategory::Regex
            }
            Operator::Col
            | Operator::NotCol
            | Operator::GtCol
            | Operator::GteCol
            | Operator::LtCol
            | Operator::LteCol => OperatorCategory::ColumnCompare,
            Operator::And | Operator::Or => OperatorCategory::BooleanGroup,
        }
    }

    pub fn lookup(token: &str) -> Result<(&'static str, OperatorCategory), FilterError> {
        let op: Operator = token.parse()?;
        Ok((op.sql_text(), op.category()))
    }

    pub fn is_group(self) -> bool {
        self.category() == OperatorCategory::BooleanGroup
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "$eq" => Ok(Operator::Eq),
            "$ne" => Ok(Operator::Ne),
            "$gt" => Ok(Operator::Gt),
            "$gte" => Ok(Operator::Gte),
            "$lt" => Ok(Operator::Lt),
            "$lte" => Ok(Operator::Lte),
            "$is" => Ok(Operator::Is),
            "$not" => Ok(Operator::Not),
            "$isNot" | "$notIs" => Ok(Operator::IsNot),
            "$like" => Ok(Operator::Like),
            "$notLike" => Ok(Operator::NotLike),
            "$iLike" => Ok(Operator::ILike),
            "$notILike" => Ok(Operator::NotILike),
            "$between" => Ok(Operator::Between),
            "$notBetween" => Ok(Operator::NotBetween),
            "$in" => Ok(Operator::In),
            "$notIn" => Ok(Operator::NotIn),
            "$regexp" => Ok(Operator::Regexp),
            "$notRegexp" => Ok(Operator::NotRegexp),
            "$iRegexp" => Ok(Operator::IRegexp),
            "$notIRegexp" => Ok(Operator::NotIRegexp),
            "$col" => Ok(Operator::Col),
            "$notCol" => Ok(Operator::NotCol),
            "$gtCol" => Ok(Operator::GtCol),
            "$gteCol" => Ok(Operator::GteCol),
            "$ltCol" => Ok(Operator::LtCol),
            "$lteCol" => Ok(Operator::LteCol),
            "$and" => Ok(Operator::And),
            "$or" => Ok(Operator::Or),
            _ => Err(FilterError::UnknownOperator(token.to_string())),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
