use postgresql_embedded::PostgreSQL;

use super::SHARED_RUNTIME;
use crate::config::DbConfig;
use crate::error::LightbnbDbError;
use crate::pool::ConfigAndPool;

/// DDL for `users`, `properties`, `reservations` and `property_reviews`.
pub const LIGHTBNB_SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    /// Settings that reach the embedded server's freshly created database
    pub config: DbConfig,
}

/// Start an embedded `PostgreSQL` instance and create `dbname` in it.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, the
/// database cannot be created, or the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(dbname).await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let config = DbConfig {
            host: settings.host.clone(),
            port,
            user: Some(settings.username.clone()),
            password: Some(settings.password.clone()),
            dbname: dbname.to_string(),
            max_pool_size: 4,
        };

        let cap = ConfigAndPool::from_db_config(&config).await?;
        let conn = cap.get_connection().await?;
        conn.execute("SELECT 1", &[]).await?;
        println!("PostgreSQL started on port {port}");

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            config,
        })
    })
}

/// Create the LightBnB tables, dropping any previous copies first.
///
/// # Errors
/// Returns `LightbnbDbError` if a connection cannot be obtained or the DDL fails.
pub async fn load_schema(cap: &ConfigAndPool) -> Result<(), LightbnbDbError> {
    let conn = cap.get_connection().await?;
    conn.batch_execute(LIGHTBNB_SCHEMA).await?;
    Ok(())
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
