use crate::app_config::{AppConfig, Environment, StoreApiConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let store_api = |prefix: &str| -> Option<StoreApiConfig> {
        let get = |suffix: &str| {
            lookup(&format!("{prefix}_API_{suffix}"))
                .ok()
                .filter(|v| !v.trim().is_empty())
        };
        Some(StoreApiConfig {
            url: get("URL")?,
            host: get("HOST")?,
            key: get("KEY")?,
        })
    };

    let external_api_url =
        parse_base_url(&or_default("EXTERNAL_API_URL", "http://localhost:8000"))?;
    let env = parse_environment(&or_default("PRICEBYTE_ENV", "development"))?;
    let bind_addr = parse_addr("PRICEBYTE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PRICEBYTE_LOG_LEVEL", "info");

    let upstream_timeout_secs = parse_u64("PRICEBYTE_UPSTREAM_TIMEOUT_SECS", "30")?;
    let search_timeout_secs = parse_u64("PRICEBYTE_SEARCH_TIMEOUT_SECS", "10")?;
    for (var, value) in [
        ("PRICEBYTE_UPSTREAM_TIMEOUT_SECS", upstream_timeout_secs),
        ("PRICEBYTE_SEARCH_TIMEOUT_SECS", search_timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
    }
    let user_agent = or_default("PRICEBYTE_USER_AGENT", "pricebyte/0.1 (price-comparison)");

    let search_cache_max_entries = parse_usize("PRICEBYTE_SEARCH_CACHE_MAX_ENTRIES", "100")?;
    let search_cache_ttl_secs = parse_u64("PRICEBYTE_SEARCH_CACHE_TTL_SECS", "300")?;

    Ok(AppConfig {
        external_api_url,
        env,
        bind_addr,
        log_level,
        upstream_timeout_secs,
        search_timeout_secs,
        user_agent,
        search_cache_max_entries,
        search_cache_ttl_secs,
        coles_api: store_api("COLES"),
        woolies_api: store_api("WOOLIES"),
    })
}

/// Validates the upstream base URL and strips any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "EXTERNAL_API_URL".to_string(),
            reason: format!("\"{raw}\" is not an http(s) URL"),
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PRICEBYTE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
