/// Failure of a persistence operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Any error reported by sqlx (connection, protocol, or database).
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("duplicate value violates unique constraint \"{0}\"")]
    UniqueViolation(String),

    /// The backing store cannot be reached.
    #[error("store unavailable")]
    Unavailable,
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Map a sqlx error, lifting unique constraint violations into
    /// [`StoreError::UniqueViolation`].
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                tracing::debug!(%constraint, "Unique constraint violated");
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Sqlx(err)
    }
}
