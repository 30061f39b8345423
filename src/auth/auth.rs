use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Identity attached by the auth gate. The role is the one currently stored
/// for the user, not the one baked into the token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: u64,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthenticated.into()),
        )
    }
}

impl AuthUser {
    /// Reports are visible to their owner and to admins.
    pub fn require_self_or_admin(&self, teacher_id: u64) -> Result<(), ApiError> {
        if self.user_id == teacher_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_pass_others_do_not() {
        let teacher = AuthUser { user_id: 7, role: Role::Teacher };
        let admin = AuthUser { user_id: 1, role: Role::Admin };

        assert!(teacher.require_self_or_admin(7).is_ok());
        assert!(matches!(teacher.require_self_or_admin(8), Err(ApiError::Forbidden)));
        assert!(admin.require_self_or_admin(8).is_ok());
    }
}
