use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{TypeConstraintError, UserRoles, Username};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub roles: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterPayload {
    pub username: Username,
    pub password: String,
    pub roles: UserRoles,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("Auth form validation failed: {0}")]
    Validation(String),
    #[error("Auth form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AuthFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AuthFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = AuthFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let roles = match value.roles.filter(|roles| !roles.trim().is_empty()) {
            Some(roles) => UserRoles::new(roles)?,
            None => UserRoles::default(),
        };
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
            roles,
        })
    }
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = AuthFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_defaults_roles() {
        let payload = RegisterPayload::try_from(RegisterForm {
            username: "budi".into(),
            password: "rahasia".into(),
            roles: None,
        })
        .unwrap();
        assert_eq!(payload.roles.as_str(), "user");
    }

    #[test]
    fn register_rejects_short_password() {
        let result = RegisterPayload::try_from(RegisterForm {
            username: "budi".into(),
            password: "123".into(),
            roles: Some("admin".into()),
        });
        assert!(matches!(result, Err(AuthFormError::Validation(_))));
    }

    #[test]
    fn login_rejects_blank_username() {
        let result = LoginPayload::try_from(LoginForm {
            username: "   ".into(),
            password: "secret".into(),
        });
        assert!(matches!(result, Err(AuthFormError::TypeConstraint(_))));
    }
}
