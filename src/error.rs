use thiserror::Error;

use tokio_postgres::error::SqlState;

#[derive(Debug, Error)]
pub enum LightbnbDbError {
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error(transparent)]
    PoolError(#[from] deadpool_postgres::PoolError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Row mapping error: {0}")]
    RowMapping(String),
}

impl LightbnbDbError {
    /// The SQLSTATE reported by the server, when the failure came from Postgres.
    #[must_use]
    pub fn sql_state(&self) -> Option<&SqlState> {
        match self {
            LightbnbDbError::PostgresError(err) => err.code(),
            LightbnbDbError::PoolError(deadpool_postgres::PoolError::Backend(err)) => err.code(),
            _ => None,
        }
    }

    /// True when the store rejected a write because of a unique constraint,
    /// e.g. registering an email that already exists.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.sql_state() == Some(&SqlState::UNIQUE_VIOLATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_postgres_errors_have_no_sql_state() {
        let err = LightbnbDbError::RowMapping("missing column `id`".into());
        assert!(err.sql_state().is_none());
        assert!(!err.is_unique_violation());
        assert_eq!(err.to_string(), "Row mapping error: missing column `id`");
    }
}
