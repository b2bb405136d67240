use super::{compile, Dialect, JoinClause, QualifiedColumn, Scope, Statement, WhereClause};
use crate::ast::{Direction, JoinSpec, OrderTerm, QueryDescriptor, RawFilter};
use crate::error::{Clause, Error, SqlError};
use crate::parser::{normalize, parse_column_path, parse_identifier, NormalizeOptions};

/// Assembles a [`QueryDescriptor`] into a [`Statement`] against one main table.
///
/// Clauses are applied in a fixed order regardless of how the descriptor was
/// written: select, where, order, group, joins, take, skip. Join aliases are
/// registered before anything is compiled so every clause can reference them.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    alias: Option<String>,
    options: NormalizeOptions,
    dialect: Dialect,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            options: NormalizeOptions::default(),
            dialect: Dialect::default(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// The main table alias; defaults to the last segment of the table name.
    pub fn alias(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.table.rsplit('.').next().unwrap_or(&self.table),
        }
    }

    pub fn build(&self, descriptor: &QueryDescriptor) -> Result<Statement, Error> {
        let mut scope = self.build_from_clause()?;
        self.register_joins(&mut scope, &descriptor.joins)?;

        let select = self.build_select_clause(&scope, &descriptor.select)?;
        let filter = self.build_where_clause(&scope, descriptor.filter.as_ref())?;
        let order = self.build_order_clause(&scope, descriptor, &select)?;
        let group = self.build_group_clause(&scope, descriptor.group.as_deref(), &order)?;
        let joins = self.build_join_clauses(&scope, &descriptor.joins)?;

        let statement = Statement {
            table: self.table.clone(),
            alias: self.alias().to_string(),
            dialect: self.dialect,
            select,
            filter,
            order,
            group,
            joins,
            take: descriptor.take,
            skip: descriptor.skip,
        };

        tracing::debug!(
            table = %statement.table,
            alias = %statement.alias,
            joins = statement.joins.len(),
            params = statement.params().len(),
            "assembled statement"
        );

        Ok(statement)
    }

    fn build_from_clause(&self) -> Result<Scope, Error> {
        if self.table.is_empty() {
            return Err(SqlError::EmptyTableName.into());
        }

        parse_column_path(&self.table).map_err(Error::in_clause(Clause::From))?;
        let alias = parse_identifier(self.alias()).map_err(Error::in_clause(Clause::From))?;
        Ok(Scope::new(alias))
    }

    fn register_joins(&self, scope: &mut Scope, joins: &[JoinSpec]) -> Result<(), Error> {
        for join in joins {
            let alias = join.alias();
            let inserted = scope
                .register_join(alias)
                .map_err(Error::in_clause(Clause::Join(alias.to_string())))?;
            if !inserted {
                return Err(SqlError::DuplicateJoinAlias(alias.to_string()).into());
            }
        }
        Ok(())
    }

    fn build_select_clause(
        &self,
        scope: &Scope,
        columns: &[String],
    ) -> Result<Vec<QualifiedColumn>, Error> {
        if columns.is_empty() {
            return Err(SqlError::SelectRequired.into());
        }

        columns
            .iter()
            .map(|column| {
                scope
                    .qualify_select(column)
                    .map_err(Error::in_clause(Clause::Select))
            })
            .collect()
    }

    fn build_where_clause(
        &self,
        scope: &Scope,
        filter: Option<&RawFilter>,
    ) -> Result<WhereClause, Error> {
        let Some(raw) = filter else {
            return Ok(WhereClause::default());
        };

        normalize(raw, &self.options)
            .and_then(|node| compile(&node, scope, ""))
            .map_err(Error::in_clause(Clause::Where))
    }

    fn build_order_clause(
        &self,
        scope: &Scope,
        descriptor: &QueryDescriptor,
        select: &[QualifiedColumn],
    ) -> Result<Vec<(QualifiedColumn, Direction)>, Error> {
        descriptor
            .order
            .iter()
            .map(|OrderTerm { column, direction }| {
                let column = scope
                    .qualify(column)
                    .map_err(Error::in_clause(Clause::Order))?;

                if descriptor.has_joins() && !select.iter().any(|s| s.covers(&column)) {
                    return Err(SqlError::AmbiguousOrderGroup {
                        column: column.to_string(),
                        expected_in: "select",
                    }
                    .into());
                }

                Ok((column, *direction))
            })
            .collect()
    }

    fn build_group_clause(
        &self,
        scope: &Scope,
        group: Option<&[String]>,
        order: &[(QualifiedColumn, Direction)],
    ) -> Result<Vec<QualifiedColumn>, Error> {
        let Some(columns) = group else {
            return Ok(Vec::new());
        };

        let group = columns
            .iter()
            .map(|column| scope.qualify(column).map_err(Error::in_clause(Clause::Group)))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some((column, _)) = order.iter().find(|(column, _)| !group.contains(column)) {
            return Err(SqlError::AmbiguousOrderGroup {
                column: column.to_string(),
                expected_in: "group",
            }
            .into());
        }

        Ok(group)
    }

    fn build_join_clauses(
        &self,
        scope: &Scope,
        joins: &[JoinSpec],
    ) -> Result<Vec<JoinClause>, Error> {
        joins
            .iter()
            .enumerate()
            .map(|(ordinal, join)| {
                let alias = join.alias();
                let in_join = || Error::in_clause(Clause::Join(alias.to_string()));

                parse_column_path(&join.table).map_err(in_join())?;

                let condition = match &join.condition {
                    Some(raw) => {
                        let join_scope = scope.with_active_join(alias);
                        normalize(raw, &self.options)
                            .and_then(|node| {
                                compile(&node, &join_scope, &format!("J_{}_", ordinal))
                            })
                            .map_err(in_join())?
                    }
                    None => WhereClause::default(),
                };

                Ok(JoinClause {
                    kind: join.kind,
                    table: join.table.clone(),
                    alias: alias.to_string(),
                    condition,
                })
            })
            .collect()
    }
}
