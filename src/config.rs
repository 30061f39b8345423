use anyhow::{Context, Result, anyhow};
use std::env;
use std::str::FromStr;

/// Longest accepted token lifetime, one year in seconds.
pub const MAX_ACCESS_TOKEN_TTL: u64 = 365 * 24 * 60 * 60;

/// Where the MySQL server lives. A full URL wins over the individual parts.
#[derive(Clone, Debug, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        username: String,
        password: String,
        database: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    /// seconds
    pub access_token_ttl: u64,
    pub log_dir: String,
    /// Browser origins allowed by CORS. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Served at `/` when the directory exists.
    pub public_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port: u16 = parse_or(&lookup, "PORT", 8000)?;
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| format!("0.0.0.0:{port}"));

        let database = match lookup("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(&lookup, "DB_PORT", 3306)?,
                username: lookup("DB_USERNAME")
                    .ok_or_else(|| anyhow!("DATABASE_URL or DB_USERNAME must be set"))?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: lookup("DB_NAME").unwrap_or_else(|| "leaveDB".to_string()),
            },
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        let access_token_ttl: u64 = parse_or(&lookup, "ACCESS_TOKEN_TTL", 86_400)?; // default 24h
        if access_token_ttl == 0 || access_token_ttl > MAX_ACCESS_TOKEN_TTL {
            return Err(anyhow!(
                "ACCESS_TOKEN_TTL must be between 1 and {MAX_ACCESS_TOKEN_TTL} seconds, got {access_token_ttl}"
            ));
        }

        Ok(Self {
            server_addr,
            database,
            jwt_secret,
            access_token_ttl,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            cors_allowed_origins: parse_origins(lookup("CORS_ALLOWED_ORIGINS").as_deref()),
            public_dir: lookup("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()),
        })
    }
}

/// Comma separated list; unset, blank or containing `*` allows every origin.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
