use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

pub const DB_URL_ENV: &str = "LOVEMATCH_DB_URL";
pub const HTTP_ADDR_ENV: &str = "LOVEMATCH_HTTP_ADDR";
pub const PORT_ENV: &str = "PORT";
pub const STORE_TIMEOUT_ENV: &str = "LOVEMATCH_STORE_TIMEOUT_MS";
pub const CORS_ORIGIN_ENV: &str = "LOVEMATCH_CORS_ORIGIN";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LOVEMATCH_DB_URL must be set to a record store connection string")]
    MissingDbUrl,
    #[error("PORT is not a valid port: {0}")]
    InvalidPort(String),
    #[error("LOVEMATCH_CORS_ORIGIN is not a valid header value: {0:?}")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_url: String,
    pub http_addr: String,
    pub store_timeout: Duration,
    pub cors_origin: HeaderValue,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_url = value(DB_URL_ENV).ok_or(ConfigError::MissingDbUrl)?;

        let http_addr = match value(HTTP_ADDR_ENV) {
            Some(addr) => addr,
            None => {
                let port = match value(PORT_ENV) {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort(raw))?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let timeout_ms = value(STORE_TIMEOUT_ENV)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS)
            .clamp(50, 60_000);

        let cors_origin = match value(CORS_ORIGIN_ENV) {
            Some(origin) => HeaderValue::from_str(&origin)
                .map_err(|_| ConfigError::InvalidCorsOrigin(origin))?,
            None => HeaderValue::from_static("*"),
        };

        Ok(Self {
            db_url,
            http_addr,
            store_timeout: Duration::from_millis(timeout_ms),
            cors_origin,
        })
    }
}
