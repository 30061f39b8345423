use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use leave_tracker::config::Config;
use leave_tracker::db::init_db;
use leave_tracker::docs::ApiDoc;
use leave_tracker::logging::init_logging;
use leave_tracker::routes;
use leave_tracker::store::Store;
use leave_tracker::store::mysql::MySqlStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;
    let _guard = init_logging(&config.log_dir);

    info!("Server starting...");

    // no degraded mode: without a database the process exits
    let pool = init_db(&config.database)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Database connection failed"))
        .context("Failed to connect to database")?;

    let store: Arc<dyn Store> = Arc::new(MySqlStore::new(pool.clone()));
    let store = Data::from(store);
    let config_data = Data::new(config.clone());
    let cors_origins = config.cors_allowed_origins.clone();
    let public_dir = config.public_dir.clone();

    info!(address = %config.server_addr, "Binding HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&cors_origins))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(config_data.clone())
            .configure(routes::configure)
            .configure(|cfg| routes::static_files(cfg, &public_dir))
    })
    .bind(&config.server_addr)
    .with_context(|| format!("Failed to bind {}", config.server_addr))?
    .run()
    .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
