use crate::error::FilterError;
use crate::parser::{parse_column_path, parse_identifier};
use std::collections::BTreeSet;
use std::fmt;

/// A column reference that has passed identifier validation.
///
/// Only [`Scope`] and [`validate_and_qualify`] can produce one, so every
/// identifier interpolated into generated SQL has been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedColumn {
    alias: String,
    path: Vec<String>,
}

impl QualifiedColumn {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_wildcard(&self) -> bool {
        self.path.len() == 1 && self.path[0] == "*"
    }

    /// True when selecting `self` makes `other` available, e.g. `o.*` covers `o.total`.
    pub fn covers(&self, other: &QualifiedColumn) -> bool {
        self == other || (self.is_wildcard() && self.alias == other.alias)
    }

    fn wildcard(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            path: vec!["*".to_string()],
        }
    }
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.path.join("."))
    }
}

/// Validates `identifier` and qualifies it with a table alias.
///
/// An undotted identifier is qualified with `default_alias`. A dotted one must
/// start with `default_alias` or a member of `join_aliases`; the remaining
/// segments are kept verbatim as the column path.
///
/// ```
/// use query_filter::sql::validate_and_qualify;
/// use std::collections::BTreeSet;
///
/// let joins = BTreeSet::from(["orders".to_string()]);
/// let column = validate_and_qualify("orders.total", "users", &joins).unwrap();
/// assert_eq!(column.to_string(), "orders.total");
/// assert!(validate_and_qualify("items.total", "users", &joins).is_err());
/// ```
pub fn validate_and_qualify(
    identifier: &str,
    default_alias: &str,
    join_aliases: &BTreeSet<String>,
) -> Result<QualifiedColumn, FilterError> {
    let mut segments = parse_column_path(identifier)?;

    if segments.len() == 1 {
        return Ok(QualifiedColumn {
            alias: default_alias.to_string(),
            path: segments,
        });
    }

    let path = segments.split_off(1);
    let alias = segments.remove(0);
    if alias != default_alias && !join_aliases.contains(&alias) {
        return Err(FilterError::UnknownJoinAlias {
            alias,
            identifier: identifier.to_string(),
        });
    }

    Ok(QualifiedColumn { alias, path })
}

/// The aliases visible while compiling one query.
///
/// Join aliases are registered before any clause is compiled; compilation only
/// reads them. A join condition is compiled against a derived scope whose
/// active alias is that join.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    main_alias: String,
    aliases: BTreeSet<String>,
    active_join: Option<String>,
}

impl Scope {
    pub fn new(main_alias: impl Into<String>) -> Self {
        let main_alias = main_alias.into();
        let mut aliases = BTreeSet::new();
        aliases.insert(main_alias.clone());
        Self {
            main_alias,
            aliases,
            active_join: None,
        }
    }

    pub fn main_alias(&self) -> &str {
        &self.main_alias
    }

    pub fn active_join(&self) -> Option<&str> {
        self.active_join.as_deref()
    }

    /// Registered join aliases, without the main alias.
    pub fn join_aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .filter(move |alias| *alias != self.main_alias)
    }

    pub fn is_known(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    /// Registers a join alias. Returns `false` if the alias is already taken,
    /// including by the main table.
    pub fn register_join(&mut self, alias: &str) -> Result<bool, FilterError> {
        let alias = parse_identifier(alias)?;
        Ok(self.aliases.insert(alias))
    }

    pub fn with_active_join(&self, alias: &str) -> Scope {
        Scope {
            main_alias: self.main_alias.clone(),
            aliases: self.aliases.clone(),
            active_join: Some(alias.to_string()),
        }
    }

    fn default_alias(&self) -> &str {
        self.active_join.as_deref().unwrap_or(&self.main_alias)
    }

    pub fn qualify(&self, identifier: &str) -> Result<QualifiedColumn, FilterError> {
        validate_and_qualify(identifier, self.default_alias(), &self.aliases)
    }

    /// Like [`Scope::qualify`], but also accepts `*` and `alias.*`.
    pub fn qualify_select(&self, identifier: &str) -> Result<QualifiedColumn, FilterError> {
        if identifier == "*" {
            return Ok(QualifiedColumn::wildcard(self.default_alias()));
        }

        match identifier.strip_suffix(".*") {
            Some(alias) => {
                let alias = parse_identifier(alias)?;
                if !self.is_known(&alias) {
                    return Err(FilterError::UnknownJoinAlias {
                        alias,
                        identifier: identifier.to_string(),
                    });
                }
                Ok(QualifiedColumn::wildcard(&alias))
            }
            None => self.qualify(identifier),
        }
    }
}
