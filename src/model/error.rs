use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
}

impl DatabaseError {
    /// True when the underlying driver reported a violated UNIQUE
    /// constraint. The duplicate-safe write guards rely on this to turn the
    /// race-window loser into a domain conflict instead of a 500.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::SqlxError(sqlx::Error::Database(e)) if e.is_unique_violation()
        )
    }
}
