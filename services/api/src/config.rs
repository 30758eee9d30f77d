use std::net::SocketAddr;
use tracing::Level;
use wisby_core::auth::DEFAULT_TRUSTED_ORIGINS;
use wisby_core::database::DatabaseKind;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

pub const DEFAULT_COOKIE_DOMAIN: &str = ".donext.org";

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub db_type: DatabaseKind,
    pub auth_url: String,
    pub auth_secret: String,
    pub trusted_origins: Vec<String>,
    pub cookie_domain: String,
    /// Set when `VERCEL_ENV` or `NODE_ENV` is `production`.
    pub production: bool,
    pub log_level: Level,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn is_production() -> bool {
    ["VERCEL_ENV", "NODE_ENV"]
        .iter()
        .any(|name| std::env::var(name).is_ok_and(|v| v == "production"))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = required("DATABASE_URL")?;

        let db_type = match std::env::var("DB_TYPE") {
            Ok(value) => value
                .parse::<DatabaseKind>()
                .map_err(|e| ConfigError::InvalidValue("DB_TYPE".to_string(), e.to_string()))?,
            Err(_) => DatabaseKind::default(),
        };

        let auth_url = required("BETTER_AUTH_URL")?;
        let auth_secret = required("BETTER_AUTH_SECRET")?;

        let trusted_origins = match std::env::var("TRUSTED_ORIGINS") {
            Ok(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => DEFAULT_TRUSTED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        };

        let cookie_domain =
            std::env::var("COOKIE_DOMAIN").unwrap_or_else(|_| DEFAULT_COOKIE_DOMAIN.to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            database_url,
            db_type,
            auth_url,
            auth_secret,
            trusted_origins,
            cookie_domain,
            production: is_production(),
            log_level,
        })
    }
}
