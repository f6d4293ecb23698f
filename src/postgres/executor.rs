use async_trait::async_trait;
use deadpool_postgres::Object;

use super::params::Params as PgParams;
use super::query::build_result_set_from_statement;
use crate::error::LightbnbDbError;
use crate::executor::QueryExecutor;
use crate::pool::ConfigAndPool;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute one statement with parameters and collect every returned row.
///
/// Statements are prepared through the connection's statement cache, so the
/// fixed-shape lookups are parsed once per pooled connection.
///
/// # Errors
/// Returns errors from statement preparation, execution, or row conversion.
pub async fn execute_select(
    pg_client: &Object,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, LightbnbDbError> {
    let stmt = pg_client.prepare_cached(query).await?;
    let converted = PgParams::convert(params);
    let rows = pg_client.query(&stmt, converted.as_refs()).await?;
    build_result_set_from_statement(&stmt, &rows)
}

#[async_trait]
impl QueryExecutor for ConfigAndPool {
    async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, LightbnbDbError> {
        let conn = self.get_connection().await?;
        execute_select(&conn, query, params).await
    }
}
