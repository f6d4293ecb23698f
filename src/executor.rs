use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LightbnbDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Runs one parameterized statement and returns every row it produced.
///
/// The pooled Postgres backend implements this; anything else that can answer
/// a statement with a `ResultSet` (an in-memory fake, a recording wrapper) can
/// stand in for it.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `query` with positional `params` (`$1` is `params[0]`).
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, LightbnbDbError>;
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, LightbnbDbError> {
        (**self).execute_select(query, params).await
    }
}
