use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller's credentials were rejected.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The write collides with an existing entity.
    #[error("{0}")]
    Conflict(String),
    /// Submitted form data failed validation.
    #[error("{0}")]
    Form(String),
    /// A value violated a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// The request is well formed but breaks a business rule.
    #[error("{0}")]
    Validation(String),
    /// Saving an image file failed.
    #[error("storage error: {0}")]
    Storage(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
