//! Load [`ServerConfig`] from environment variables.

use super::types::*;
use crate::error::ConfigError;
use std::fmt::Display;
use std::str::FromStr;

/// Read settings from the process environment (after `.env` has been loaded by the caller).
pub fn load_from_env() -> Result<ServerConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Read settings through `lookup`, falling back to defaults for unset or empty variables.
pub fn load_with<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let config = ServerConfig {
        database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        bind_addr: parse_var("BIND_ADDR", get("BIND_ADDR").as_deref().unwrap_or(DEFAULT_BIND_ADDR))?,
        max_connections: match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse_var("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        },
        body_limit_bytes: match get("BODY_LIMIT_BYTES") {
            Some(v) => parse_var("BODY_LIMIT_BYTES", &v)?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        },
        store_backend: match get("STORE_BACKEND") {
            Some(v) => parse_var("STORE_BACKEND", &v)?,
            None => StoreBackend::default(),
        },
    };
    if config.max_connections == 0 {
        return Err(ConfigError::Invalid {
            var: "DB_MAX_CONNECTIONS",
            reason: "must be at least 1".into(),
        });
    }
    Ok(config)
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("'{}': {}", value, e),
    })
}
