use serde::Serialize;

use crate::domain::user::User;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub roles: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.into_inner(),
            roles: value.roles.into_inner(),
        }
    }
}
