use thiserror::Error;

/// Errors produced by schema extraction, statement building, and the CRUD
/// operations.
#[derive(Debug, Error)]
pub enum SqlRecordError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no primary key set or found for record")]
    NoPrimaryKey,

    /// A single-row lookup matched zero rows. This is an expected outcome
    /// for `load`/`query_row`; callers branching on it should use
    /// [`SqlRecordError::is_not_found`].
    #[error("no rows in result")]
    NotFound,

    #[error("value conversion error: {0}")]
    Conversion(String),

    #[error("SQL execution error: {0}")]
    Execution(String),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolError(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "postgres")]
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[cfg(feature = "postgres")]
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqlRecordError {
    /// True when the error is the row-missing outcome of a single-row
    /// lookup, so upsert-or-create flows can branch without matching the
    /// whole enum.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SqlRecordError::NotFound)
    }
}
