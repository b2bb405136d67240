use crate::ast::QueryDescriptor;
use crate::error::Error;
use crate::sql::{CompiledQuery, QueryBuilder, Statement};
use async_trait::async_trait;

/// Runs compiled queries against a database.
///
/// Implementations must understand the `:name` / `:...name` placeholder
/// convention, or call [`CompiledQuery::to_positional`] for their dialect.
/// Connection handling, transactions, cancellation and timeouts belong here.
#[async_trait]
pub trait Executor: Send + Sync {
    type Row: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a query and return every row
    async fn fetch_all(&self, query: &CompiledQuery) -> Result<Vec<Self::Row>, Self::Error>;

    /// Execute a `COUNT(*) AS count` query and return the count
    async fn fetch_count(&self, query: &CompiledQuery) -> Result<u64, Self::Error>;

    /// Count every row of an entity, without filtering
    async fn count(&self, entity: &str) -> Result<u64, Self::Error>;
}

#[derive(thiserror::Error, Debug)]
pub enum ExecuteError<E: std::error::Error + 'static> {
    #[error("total count requires a base entity")]
    MissingResource,

    #[error("executor error: {0}")]
    Driver(#[source] E),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindResult<R> {
    pub rows: Vec<R>,
    pub filter_count: Option<u64>,
    pub total_count: Option<u64>,
}

/// A built statement together with the operations that hand it to an [`Executor`].
#[derive(Debug, Clone)]
pub struct FilterQuery {
    statement: Statement,
    base_entity: Option<String>,
}

impl FilterQuery {
    pub fn new(statement: Statement) -> Self {
        Self {
            statement,
            base_entity: None,
        }
    }

    pub fn build(builder: &QueryBuilder, descriptor: &QueryDescriptor) -> Result<Self, Error> {
        builder.build(descriptor).map(Self::new)
    }

    /// The entity counted by [`FilterQuery::total_count`] when none is passed.
    pub fn with_base_entity(mut self, entity: impl Into<String>) -> Self {
        self.base_entity = Some(entity.into());
        self
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn to_sql(&self) -> String {
        self.statement.to_sql()
    }

    pub fn to_query(&self) -> CompiledQuery {
        self.statement.to_query()
    }

    pub async fn find_all<X: Executor>(
        &self,
        executor: &X,
    ) -> Result<Vec<X::Row>, ExecuteError<X::Error>> {
        let query = self.to_query();
        tracing::debug!(sql = %query.sql, params = query.params.len(), "find_all");
        executor.fetch_all(&query).await.map_err(ExecuteError::Driver)
    }

    pub async fn find_one<X: Executor>(
        &self,
        executor: &X,
    ) -> Result<Option<X::Row>, ExecuteError<X::Error>> {
        let query = self.statement.first_query();
        tracing::debug!(sql = %query.sql, "find_one");
        let rows = executor.fetch_all(&query).await.map_err(ExecuteError::Driver)?;
        Ok(rows.into_iter().next())
    }

    /// Rows matched by the filter, ignoring paging.
    pub async fn filter_count<X: Executor>(
        &self,
        executor: &X,
    ) -> Result<u64, ExecuteError<X::Error>> {
        let query = self.statement.count_query();
        tracing::debug!(sql = %query.sql, "filter_count");
        executor.fetch_count(&query).await.map_err(ExecuteError::Driver)
    }

    /// Every row of `entity` (or the base entity), ignoring the filter.
    pub async fn total_count<X: Executor>(
        &self,
        executor: &X,
        entity: Option<&str>,
    ) -> Result<u64, ExecuteError<X::Error>> {
        let entity = entity
            .or(self.base_entity.as_deref())
            .ok_or(ExecuteError::MissingResource)?;
        tracing::debug!(entity = %entity, "total_count");
        executor.count(entity).await.map_err(ExecuteError::Driver)
    }

    pub async fn find<X: Executor>(
        &self,
        executor: &X,
        with_counts: bool,
    ) -> Result<FindResult<X::Row>, ExecuteError<X::Error>> {
        if !with_counts {
            return Ok(FindResult {
                rows: self.find_all(executor).await?,
                filter_count: None,
                total_count: None,
            });
        }

        let entity = self
            .base_entity
            .as_deref()
            .ok_or(ExecuteError::MissingResource)?;
        let rows = self.find_all(executor).await?;
        let filter_count = self.filter_count(executor).await?;
        let total_count = self.total_count(executor, Some(entity)).await?;
        Ok(FindResult {
            rows,
            filter_count: Some(filter_count),
            total_count: Some(total_count),
        })
    }
}
