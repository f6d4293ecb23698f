use deadpool_postgres::{Config as PgConfig, Runtime};
use tokio_postgres::NoTls;

use crate::config::DbConfig;
use crate::error::LightbnbDbError;
use crate::pool::ConfigAndPool;

impl ConfigAndPool {
    /// Build the pool from process-level settings.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::ConfigError` if required config fields are missing or `LightbnbDbError::ConnectionError` if pool creation fails.
    pub async fn from_db_config(config: &DbConfig) -> Result<Self, LightbnbDbError> {
        Self::new_postgres(config.to_pg_config()).await
    }

    /// Asynchronous initializer for `ConfigAndPool` with Postgres
    ///
    /// No connection is opened here; the first checkout connects.
    ///
    /// # Errors
    /// Returns `LightbnbDbError::ConfigError` if required config fields are missing or `LightbnbDbError::ConnectionError` if pool creation fails.
    #[allow(clippy::unused_async)]
    pub async fn new_postgres(pg_config: PgConfig) -> Result<Self, LightbnbDbError> {
        if pg_config.dbname.is_none() {
            return Err(LightbnbDbError::ConfigError(
                "dbname is required".to_string(),
            ));
        }
        if pg_config.host.is_none() {
            return Err(LightbnbDbError::ConfigError(
                "host is required".to_string(),
            ));
        }
        if pg_config.port.is_none() {
            return Err(LightbnbDbError::ConfigError(
                "port is required".to_string(),
            ));
        }
        if pg_config.user.is_none() {
            return Err(LightbnbDbError::ConfigError(
                "user is required".to_string(),
            ));
        }
        if pg_config.password.is_none() {
            return Err(LightbnbDbError::ConfigError(
                "password is required".to_string(),
            ));
        }

        let pool = pg_config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| {
                LightbnbDbError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        tracing::debug!(
            host = ?pg_config.host,
            dbname = ?pg_config.dbname,
            "postgres pool created"
        );

        Ok(ConfigAndPool { pool })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_user_is_a_config_error() {
        let cfg = DbConfig {
            password: Some("123".into()),
            ..DbConfig::default()
        };
        let err = ConfigAndPool::from_db_config(&cfg).await.unwrap_err();
        assert!(matches!(err, LightbnbDbError::ConfigError(msg) if msg == "user is required"));
    }

    #[tokio::test]
    async fn missing_password_is_a_config_error() {
        let cfg = DbConfig {
            user: Some("vagrant".into()),
            ..DbConfig::default()
        };
        let err = ConfigAndPool::from_db_config(&cfg).await.unwrap_err();
        assert!(matches!(err, LightbnbDbError::ConfigError(msg) if msg == "password is required"));
    }

    #[tokio::test]
    async fn complete_config_builds_a_lazy_pool() {
        let cfg = DbConfig {
            user: Some("vagrant".into()),
            password: Some("123".into()),
            max_pool_size: 3,
            ..DbConfig::default()
        };
        let cap = ConfigAndPool::from_db_config(&cfg).await.unwrap();
        assert_eq!(cap.pool.status().max_size, 3);
    }
}
