/// Domain errors raised by the data layer
///
/// Every model operation returns `Result<T, StoreError>`. The API layer is
/// responsible for translating these into transport-level responses; the
/// data layer never retries internally.
///
/// # Error kinds
///
/// - `NotFound`: the target id, or a required foreign parent, does not exist
/// - `Conflict`: a uniqueness violation (duplicate email, duplicate
///   membership/participation pair)
/// - `InvalidInput`: a required field was missing or empty on create
/// - `Database`: any other failure from the underlying store

use thiserror::Error;

/// Result type alias for data-layer operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Unified data-layer error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target row or required parent does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness invariant violated
    #[error("{0}")]
    Conflict(String),

    /// Missing or empty required field on create
    #[error("{0}")]
    InvalidInput(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique-index violations surface as Conflict so that two
                // concurrent membership adds resolve to one winner instead
                // of a silent double insert.
                if db_err.is_unique_violation() {
                    StoreError::Conflict(format!("Uniqueness violation: {}", db_err.message()))
                } else {
                    StoreError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => StoreError::Database(other),
        }
    }
}

impl StoreError {
    /// Shorthand for the `NotFound` variant
    pub fn not_found(entity: &str) -> Self {
        StoreError::NotFound(format!("{} not found", entity))
    }
}
