use deadpool_postgres::{Object, Pool};

use crate::error::LightbnbDbError;

/// Configuration and connection pool for the database
///
/// Cloning is cheap; clones share the same underlying pool.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: Pool,
}

impl ConfigAndPool {
    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::PoolError` if no connection can be obtained.
    pub async fn get_connection(&self) -> Result<Object, LightbnbDbError> {
        Ok(self.pool.get().await?)
    }
}
