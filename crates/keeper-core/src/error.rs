//! Typed errors raised by the service layer.

use thiserror::Error;

/// Errors surfaced by list and task operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested row does not exist, or belongs to another owner. The
    /// two cases are deliberately indistinguishable so an error response
    /// never reveals whether a foreign id exists.
    #[error("{0}")]
    NotFound(String),

    /// A name-uniqueness invariant was violated at write time.
    #[error("{0}")]
    Conflict(String),

    /// Any other persistence failure. Fatal to the request; no retries.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Translate a unique-constraint violation into `Conflict`, leaving
    /// every other database error untouched.
    ///
    /// Conflicts are detected optimistically at write time from the
    /// constraint-violation signal; there is no existence pre-check to
    /// race against.
    pub fn on_unique_violation(err: sqlx::Error, msg: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::conflict(msg),
            _ => Self::Database(err),
        }
    }
}
