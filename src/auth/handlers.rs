use crate::{
    auth::{
        auth::AuthUser,
        jwt::generate_access_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::{
        role::Role,
        user::{NewUser, User, UserProfile},
    },
    models::{LoginReqDto, LoginResponse, RegisterReq, RegisterResponse},
    store::{Store, StoreError},
};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

fn validate_registration(req: &RegisterReq) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty"));
    }
    if !req.email.contains('@') || req.email.trim().len() < 3 {
        return Err(ApiError::Validation("Email must be a valid address"));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("Password must not be empty"));
    }
    Ok(())
}

fn issue_token(user: &User, config: &Config) -> Result<String, ApiError> {
    generate_access_token(user, &config.jwt_secret, config.access_token_ttl).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token");
        ApiError::Internal("Error issuing token")
    })
}

/// User registration handler
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterReq, content_type = "application/json"),
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid payload or email already registered", body = Object,
         example = json!({ "error": "Email already registered", "code": "email_taken" }))
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: web::Json<RegisterReq>,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    validate_registration(&req)?;

    let password = req.password;
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            ApiError::Internal("Error registering user")
        })?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::Internal("Error registering user")
        })?;

    let user = store
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            role: req.role.unwrap_or(Role::Teacher),
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateEmail => ApiError::EmailTaken,
            other => {
                error!(error = %other, "Failed to register user");
                ApiError::Internal("Error registering user")
            }
        })?;

    let token = issue_token(&user, &config)?;
    info!(user_id = user.id, role = %user.role, "User registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Exchange email + password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginReqDto, content_type = "application/json"),
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = Object,
         example = json!({ "error": "Invalid credentials", "code": "invalid_credentials" }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, payload),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();

    let user = match store.find_user_by_email(&req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(ApiError::Internal("Error logging in"));
        }
    };

    debug!(user_id = user.id, "Verifying password");
    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            ApiError::Internal("Error logging in")
        })?
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "Stored password hash is unreadable");
            ApiError::Internal("Error logging in")
        })?;

    if !matches {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_token(&user, &config)?;
    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Revokes every token issued to the caller so far
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "All tokens of the caller revoked"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(auth: AuthUser, store: web::Data<dyn Store>) -> Result<HttpResponse, ApiError> {
    store.bump_token_version(auth.user_id).await.map_err(|e| {
        error!(error = %e, user_id = auth.user_id, "Failed to revoke tokens");
        ApiError::Internal("Error logging out")
    })?;

    info!(user_id = auth.user_id, "Tokens revoked");
    Ok(HttpResponse::NoContent().finish())
}
