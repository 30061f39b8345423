use crate::{model::user::User, models::Claims};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

/// Signs `{id, role, ver}` for `user`, valid for `ttl` seconds.
pub fn generate_access_token(user: &User, secret: &str, ttl: u64) -> Result<String, Error> {
    let iat = now();
    let claims = Claims {
        id: user.id,
        role: user.role,
        ver: user.token_version,
        iat,
        exp: iat.saturating_add(usize::try_from(ttl).unwrap_or(usize::MAX)),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn user() -> User {
        User {
            id: 42,
            name: "Ada".to_string(),
            email: "ada@school.edu".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            token_version: 3,
        }
    }

    #[test]
    fn issued_token_carries_identity() {
        let token = generate_access_token(&user(), "secret", 60).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.ver, 3);
        assert_eq!(claims.exp, claims.iat + 60);
    }

    #[test]
    fn oversized_lifetime_saturates_instead_of_overflowing() {
        let token = generate_access_token(&user(), "secret", u64::MAX).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.exp, usize::MAX);
        assert!(claims.iat > 0);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(&user(), "secret", 60).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = now() - 3_600;
        let claims = Claims {
            id: 1,
            role: Role::Teacher,
            ver: 0,
            iat: past - 60,
            exp: past,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = generate_access_token(&user(), "secret", 60).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push('A');
        assert!(verify_token(&parts.join("."), "secret").is_err());
    }
}
