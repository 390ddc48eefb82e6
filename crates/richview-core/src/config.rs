use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let env = parse_environment(&or_default("RICHVIEW_ENV", "development"))?;
    let bind_addr = parse("RICHVIEW_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RICHVIEW_LOG_LEVEL", "info");

    // An empty secret is treated the same as an unset one.
    let paystack_secret_key = lookup("PAYSTACK_SECRET_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let catalog_base_url = or_default("RICHVIEW_CATALOG_BASE_URL", "https://api.paystack.co");
    let catalog_timeout_secs = parse_u64("RICHVIEW_CATALOG_TIMEOUT_SECS", "30")?;
    let catalog_user_agent = or_default("RICHVIEW_CATALOG_USER_AGENT", "richview/0.1 (storefront)");
    let catalog_max_retries = parse_u32("RICHVIEW_CATALOG_MAX_RETRIES", "2")?;
    let catalog_backoff_base_secs = parse_u64("RICHVIEW_CATALOG_BACKOFF_BASE_SECS", "1")?;

    let stores_path = PathBuf::from(or_default("RICHVIEW_STORES_PATH", "./config/stores.yaml"));
    let cart_dir = PathBuf::from(or_default("RICHVIEW_CART_DIR", "./.richview"));

    let rate_limit_per_minute = parse_usize("RICHVIEW_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RICHVIEW_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        paystack_secret_key,
        catalog_base_url,
        catalog_timeout_secs,
        catalog_user_agent,
        catalog_max_retries,
        catalog_backoff_base_secs,
        stores_path,
        cart_dir,
        rate_limit_per_minute,
    })
}

/// Parse `RICHVIEW_ENV` into an [`Environment`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RICHVIEW_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
