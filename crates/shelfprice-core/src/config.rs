use std::str::FromStr;

use crate::app_config::AppConfig;
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let defaults = AppConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let stores_path = PathBuf::from(or_default(
        "SHELFPRICE_STORES_PATH",
        &defaults.stores_path.to_string_lossy(),
    ));
    let log_level = or_default("SHELFPRICE_LOG_LEVEL", &defaults.log_level);

    let nav_timeout_secs = parse_var(
        &lookup,
        "SHELFPRICE_NAV_TIMEOUT_SECS",
        defaults.nav_timeout_secs,
    )?;
    let extract_timeout_secs = parse_var(
        &lookup,
        "SHELFPRICE_EXTRACT_TIMEOUT_SECS",
        defaults.extract_timeout_secs,
    )?;
    let fetch_max_retries = parse_var(
        &lookup,
        "SHELFPRICE_FETCH_MAX_RETRIES",
        defaults.fetch_max_retries,
    )?;
    let fetch_backoff_base_secs = parse_var(
        &lookup,
        "SHELFPRICE_FETCH_BACKOFF_BASE_SECS",
        defaults.fetch_backoff_base_secs,
    )?;

    let fetch_concurrency: usize = parse_var(
        &lookup,
        "SHELFPRICE_FETCH_CONCURRENCY",
        defaults.fetch_concurrency,
    )?;
    if fetch_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFPRICE_FETCH_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if nav_timeout_secs == 0 || extract_timeout_secs == 0 {
        let var = if nav_timeout_secs == 0 {
            "SHELFPRICE_NAV_TIMEOUT_SECS"
        } else {
            "SHELFPRICE_EXTRACT_TIMEOUT_SECS"
        };
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let user_agent = lookup("SHELFPRICE_USER_AGENT")
        .ok()
        .filter(|ua| !ua.trim().is_empty());

    Ok(AppConfig {
        log_level,
        stores_path,
        nav_timeout_secs,
        extract_timeout_secs,
        fetch_max_retries,
        fetch_backoff_base_secs,
        fetch_concurrency,
        user_agent,
    })
}

/// Parses `var` when set, falling back to `default` when it is absent.
fn parse_var<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(var).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
