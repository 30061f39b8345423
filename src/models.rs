use crate::model::role::Role;
use crate::model::user::UserProfile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@school.edu", format = "email")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    /// defaults to `teacher`
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane@school.edu", format = "email")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Login returns the profile fields at the top level next to the token.
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub id: u64,
    pub role: Role,
    /// token version of the user at issuance
    pub ver: u32,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
