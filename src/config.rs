//! Connection settings for the LightBnB store.
//!
//! `DbConfig` is populated once at process start, either from command-line
//! flags and `PG*` environment variables (flatten it into a clap parser) or
//! from a deserialized config file.

use clap::Args;
use deadpool_postgres::{Config as PgConfig, PoolConfig};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DBNAME: &str = "lightbnb";
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Where and how to reach the database.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database host name or socket directory
    #[arg(long = "db-host", env = "PGHOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "PGPORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Role to connect as
    #[arg(long = "db-user", env = "PGUSER")]
    pub user: Option<String>,

    /// Password for the role; an empty string is allowed for trust auth
    #[arg(long = "db-password", env = "PGPASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name
    #[arg(long = "db-name", env = "PGDATABASE", default_value = DEFAULT_DBNAME)]
    pub dbname: String,

    /// Upper bound on pooled connections
    #[arg(long = "db-pool-size", env = "LIGHTBNB_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub max_pool_size: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: None,
            password: None,
            dbname: DEFAULT_DBNAME.to_string(),
            max_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl DbConfig {
    /// Translate into the pool's own configuration. Blank host, user and
    /// database names become `None` so pool construction rejects them.
    #[must_use]
    pub fn to_pg_config(&self) -> PgConfig {
        let mut cfg = PgConfig::new();
        cfg.host = non_empty(&self.host);
        cfg.port = Some(self.port);
        cfg.user = self.user.as_deref().and_then(non_empty);
        cfg.password.clone_from(&self.password);
        cfg.dbname = non_empty(&self.dbname);
        cfg.pool = Some(PoolConfig::new(self.max_pool_size));
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        db: DbConfig,
    }

    #[test]
    fn flags_populate_config() {
        let cli = TestCli::try_parse_from([
            "lightbnb",
            "--db-host",
            "db.internal",
            "--db-port",
            "6543",
            "--db-user",
            "vagrant",
            "--db-password",
            "123",
            "--db-name",
            "lightbnb_test",
            "--db-pool-size",
            "4",
        ])
        .unwrap();

        assert_eq!(
            cli.db,
            DbConfig {
                host: "db.internal".into(),
                port: 6543,
                user: Some("vagrant".into()),
                password: Some("123".into()),
                dbname: "lightbnb_test".into(),
                max_pool_size: 4,
            }
        );
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let cfg: DbConfig = serde_json::from_str(r#"{"user":"vagrant","password":""}"#).unwrap();
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.dbname, DEFAULT_DBNAME);
        assert_eq!(cfg.password.as_deref(), Some(""));
    }

    #[test]
    fn blank_fields_are_left_unset_for_the_pool() {
        let cfg = DbConfig {
            host: "  ".into(),
            user: Some(String::new()),
            password: Some(String::new()),
            ..DbConfig::default()
        };
        let pg = cfg.to_pg_config();
        assert!(pg.host.is_none());
        assert!(pg.user.is_none());
        assert_eq!(pg.password.as_deref(), Some(""));
        assert_eq!(pg.dbname.as_deref(), Some(DEFAULT_DBNAME));
        assert_eq!(pg.pool.map(|p| p.max_size), Some(DEFAULT_POOL_SIZE));
    }
}
