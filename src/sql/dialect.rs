use serde::{Deserialize, Serialize};

/// Target database. Only paging syntax and positional placeholders differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    MsSql,
    Oracle,
}

// MySQL has no OFFSET without LIMIT.
const MYSQL_MAX_LIMIT: u64 = u64::MAX;

impl Dialect {
    /// The positional placeholder for the 1-based `position`.
    pub fn placeholder(self, position: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", position),
            Dialect::MySql => "?".to_string(),
            Dialect::MsSql => format!("@P{}", position),
            Dialect::Oracle => format!(":{}", position),
        }
    }

    pub(crate) fn paging(self, take: Option<u64>, skip: Option<u64>, has_order: bool) -> String {
        let mut sql = String::new();
        match self {
            Dialect::Postgres => {
                if let Some(take) = take {
                    sql.push_str(&format!(" LIMIT {}", take));
                }
                if let Some(skip) = skip {
                    sql.push_str(&format!(" OFFSET {}", skip));
                }
            }
            Dialect::MySql => match (take, skip) {
                (Some(take), Some(skip)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", take, skip)),
                (Some(take), None) => sql.push_str(&format!(" LIMIT {}", take)),
                (None, Some(skip)) => {
                    sql.push_str(&format!(" LIMIT {} OFFSET {}", MYSQL_MAX_LIMIT, skip))
                }
                (None, None) => {}
            },
            Dialect::MsSql => {
                if take.is_none() && skip.is_none() {
                    return sql;
                }
                if !has_order {
                    sql.push_str(" ORDER BY (SELECT NULL)");
                }
                sql.push_str(&format!(" OFFSET {} ROWS", skip.unwrap_or(0)));
                if let Some(take) = take {
                    sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", take));
                }
            }
            Dialect::Oracle => {
                if let Some(skip) = skip {
                    sql.push_str(&format!(" OFFSET {} ROWS", skip));
                }
                if let Some(take) = take {
                    sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", take));
                }
            }
        }
        sql
    }
}
