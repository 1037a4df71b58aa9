use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested row does not exist.
    #[error("entity not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A stored value failed domain validation.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// No connection could be drawn from the pool.
    #[error("connection error: {0}")]
    Connection(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_diesel_not_found() {
        let err: RepositoryError = DieselError::NotFound.into();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn maps_type_constraint_errors_to_validation() {
        let err: RepositoryError = TypeConstraintError::EmptyString("category").into();
        assert_eq!(err.to_string(), "validation error: category cannot be empty");
    }
}
