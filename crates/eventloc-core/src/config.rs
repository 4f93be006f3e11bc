use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the process environment,
/// so tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_with = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(raw)
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("EVENTLOC_ENV", "development"))?;

    let bind_addr = parse_with("EVENTLOC_BIND_ADDR", "0.0.0.0:3000")?
        .parse::<SocketAddr>()
        .map_err(|e| invalid("EVENTLOC_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("EVENTLOC_LOG_LEVEL", "info");

    let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let maps_base_url = parse_with("EVENTLOC_MAPS_BASE_URL", DEFAULT_MAPS_BASE_URL)?;
    url::Url::parse(&maps_base_url)
        .map_err(|e| invalid("EVENTLOC_MAPS_BASE_URL", e.to_string()))?;
    let maps_timeout_secs = parse_with("EVENTLOC_MAPS_TIMEOUT_SECS", "10")?
        .parse::<u64>()
        .map_err(|e| invalid("EVENTLOC_MAPS_TIMEOUT_SECS", e.to_string()))?;

    let db_max_connections = parse_with("EVENTLOC_DB_MAX_CONNECTIONS", "10")?
        .parse::<u32>()
        .map_err(|e| invalid("EVENTLOC_DB_MAX_CONNECTIONS", e.to_string()))?;
    let db_min_connections = parse_with("EVENTLOC_DB_MIN_CONNECTIONS", "1")?
        .parse::<u32>()
        .map_err(|e| invalid("EVENTLOC_DB_MIN_CONNECTIONS", e.to_string()))?;
    let db_acquire_timeout_secs = parse_with("EVENTLOC_DB_ACQUIRE_TIMEOUT_SECS", "10")?
        .parse::<u64>()
        .map_err(|e| invalid("EVENTLOC_DB_ACQUIRE_TIMEOUT_SECS", e.to_string()))?;

    let picker_debounce_ms = parse_with("EVENTLOC_DEBOUNCE_MS", "300")?
        .parse::<u64>()
        .map_err(|e| invalid("EVENTLOC_DEBOUNCE_MS", e.to_string()))?;
    let picker_min_query_len = parse_with("EVENTLOC_MIN_QUERY_LEN", "3")?
        .parse::<usize>()
        .map_err(|e| invalid("EVENTLOC_MIN_QUERY_LEN", e.to_string()))?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        google_maps_api_key,
        maps_base_url,
        maps_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        picker_debounce_ms,
        picker_min_query_len,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EVENTLOC_ENV".to_string(),
            reason: format!("expected development|test|production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
