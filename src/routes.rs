use crate::{
    api::{leave_report, leave_request},
    auth::{handlers, middleware::auth_middleware},
    error::ApiError,
};
use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{middleware::from_fn, web};
use std::path::Path;
use tracing::{debug, warn};

/// Malformed or incomplete JSON bodies get the same envelope as every other
/// validation failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected request body");
        ApiError::Validation("Request body is malformed or missing required fields").into()
    })
}

/// The only path parameter is a teacher id, so anything that is not one
/// names no teacher.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected path parameter");
        ApiError::TeacherNotFound.into()
    })
}

/// Empty `allowed_origins` lets any origin in, answering with `*`.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allowed_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION])
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin().send_wildcard();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Serves `dir` at `/`. Must be registered after every API route, since the
/// mount swallows whatever reaches it.
pub fn static_files(cfg: &mut web::ServiceConfig, dir: &str) {
    if !Path::new(dir).is_dir() {
        warn!(dir, "Public directory not found, static files disabled");
        return;
    }
    cfg.service(Files::new("/", dir).index_file("index.html"));
}

/// Expects `web::Data<Config>` and `web::Data<dyn Store>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config());

    // Public routes
    cfg.service(web::resource("/register").route(web::post().to(handlers::register)))
        .service(web::resource("/login").route(web::post().to(handlers::login)));

    // Protected routes
    cfg.service(
        web::resource("/logout")
            .wrap(from_fn(auth_middleware))
            .route(web::post().to(handlers::logout)),
    )
    .service(
        web::resource("/leave")
            .wrap(from_fn(auth_middleware))
            .route(web::get().to(leave_request::leave_list))
            .route(web::post().to(leave_request::create_leave)),
    )
    .service(
        web::resource("/leave-report/{teacher_id}")
            .wrap(from_fn(auth_middleware))
            .route(web::get().to(leave_report::leave_report)),
    );
}
