use crate::config::DatabaseConfig;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Only explicit bound on talking to the database.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name          VARCHAR(255)    NOT NULL,
    email         VARCHAR(255)    NOT NULL UNIQUE,
    password_hash VARCHAR(255)    NOT NULL,
    role          VARCHAR(16)     NOT NULL DEFAULT 'teacher',
    token_version INT UNSIGNED    NOT NULL DEFAULT 0
)
"#;

// teacher_id is a soft reference to users.id
const CREATE_LEAVE_REQUESTS: &str = r#"
CREATE TABLE IF NOT EXISTS leave_requests (
    id         BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    teacher_id BIGINT UNSIGNED NOT NULL,
    start_date DATE            NOT NULL,
    end_date   DATE            NOT NULL,
    reason     TEXT            NOT NULL,
    status     VARCHAR(16)     NOT NULL DEFAULT 'pending',
    created_at DATETIME        NOT NULL
)
"#;

fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions, sqlx::Error> {
    match config {
        DatabaseConfig::Url(url) => MySqlConnectOptions::from_str(url),
        DatabaseConfig::Parts {
            host,
            port,
            username,
            password,
            database,
        } => Ok(MySqlConnectOptions::new()
            .host(host)
            .port(*port)
            .username(username)
            .password(password)
            .database(database)),
    }
}

pub async fn init_db(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(config)?)
        .await?;

    ensure_schema(&pool).await?;
    info!("Database connected and schema ensured");

    Ok(pool)
}

/// Creates both tables if they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_LEAVE_REQUESTS).execute(pool).await?;
    Ok(())
}
