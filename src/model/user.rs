use crate::model::role::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// A stored account. `token_version` is bumped on logout; tokens carrying an
/// older version are rejected by the auth gate.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub token_version: u32,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public projection of a user, never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@school.edu", format = "email")]
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
