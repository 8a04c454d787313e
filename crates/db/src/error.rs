//! Repository-level error type.

use pawhaven_core::error::CoreError;

/// Error returned by repository operations.
///
/// Workflow operations validate invariants inside their transactions, so they
/// surface domain errors ([`CoreError`]) as well as driver errors. Both are
/// mapped to HTTP responses by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for repository return values.
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Short machine-readable code, used for batch failure reporting.
    pub fn code(&self) -> &'static str {
        match self {
            DbError::Core(core) => core.code(),
            DbError::Database(sqlx::Error::RowNotFound) => "NOT_FOUND",
            DbError::Database(_) => "DATABASE_ERROR",
        }
    }
}
