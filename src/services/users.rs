use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use log::{error, info};

use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginPayload, RegisterPayload};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Register a new account. A taken username is a [`ServiceError::Conflict`].
pub fn register_user<R>(payload: RegisterPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_username(&payload.username) {
        Ok(Some(_)) => {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                payload.username
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let user = NewUser {
        username: payload.username,
        password_hash,
        roles: payload.roles,
    };

    match repo.create_user(&user) {
        Ok(created) => {
            info!("Registered user {}", created.username);
            Ok(created)
        }
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(format!(
            "Username '{}' is already taken",
            user.username
        ))),
        Err(e) => {
            error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Check credentials. Unknown users and wrong passwords are indistinguishable.
pub fn login_user<R>(payload: LoginPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let user = match repo.get_user_by_username(&payload.username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Unauthorized),
        Err(e) => {
            error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if verify_password(&payload.password, &user.password_hash) {
        Ok(user)
    } else {
        Err(ServiceError::Unauthorized)
    }
}
