/// Errors raised by a [`crate::Store`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Any failure reported by sqlx that has no more specific meaning.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A write referenced a row that does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A stored row could not be decoded into a domain value.
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// PostgreSQL `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

impl StoreError {
    /// Classify a sqlx error, lifting constraint violations into their own variants.
    ///
    /// Only unique constraints named `uq_*` count as conflicts, matching the
    /// naming convention used in the migrations.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                    return StoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    ));
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::InvalidReference(format!(
                        "Foreign key constraint failed: {constraint}"
                    ));
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}
