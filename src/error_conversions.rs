//! Conversions from form, domain and storage errors into [`ServiceError`].

use crate::domain::types::TypeConstraintError;
use crate::forms::auth::AuthFormError;
use crate::forms::products::ProductFormError;
use crate::forms::queries::QueryFormError;
use crate::services::errors::ServiceError;
use crate::storage::StorageError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        match val {
            ProductFormError::FileRead => ServiceError::Storage(val.to_string()),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<QueryFormError> for ServiceError {
    fn from(val: QueryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<AuthFormError> for ServiceError {
    fn from(val: AuthFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(val: StorageError) -> Self {
        ServiceError::Storage(val.to_string())
    }
}
