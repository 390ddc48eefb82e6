use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "RICHVIEW_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.paystack_secret_key.is_none());
    assert_eq!(cfg.catalog_base_url, "https://api.paystack.co");
    assert_eq!(cfg.catalog_timeout_secs, 30);
    assert_eq!(cfg.catalog_user_agent, "richview/0.1 (storefront)");
    assert_eq!(cfg.catalog_max_retries, 2);
    assert_eq!(cfg.catalog_backoff_base_secs, 1);
    assert_eq!(cfg.stores_path.to_str(), Some("./config/stores.yaml"));
    assert_eq!(cfg.cart_dir.to_str(), Some("./.richview"));
    assert_eq!(cfg.rate_limit_per_minute, 120);
}

#[test]
fn build_app_config_reads_secret() {
    let mut map = HashMap::new();
    map.insert("PAYSTACK_SECRET_KEY", "sk_test_123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.paystack_secret_key.as_deref(), Some("sk_test_123"));
}

#[test]
fn build_app_config_blank_secret_is_none() {
    let mut map = HashMap::new();
    map.insert("PAYSTACK_SECRET_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.paystack_secret_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("RICHVIEW_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RICHVIEW_BIND_ADDR"),
        "expected InvalidEnvVar(RICHVIEW_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_catalog_timeout_override() {
    let mut map = HashMap::new();
    map.insert("RICHVIEW_CATALOG_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.catalog_timeout_secs, 5);
}

#[test]
fn build_app_config_catalog_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("RICHVIEW_CATALOG_MAX_RETRIES", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RICHVIEW_CATALOG_MAX_RETRIES"),
        "expected InvalidEnvVar(RICHVIEW_CATALOG_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_rate_limit() {
    let mut map = HashMap::new();
    map.insert("RICHVIEW_RATE_LIMIT_PER_MINUTE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RICHVIEW_RATE_LIMIT_PER_MINUTE"),
        "expected InvalidEnvVar(RICHVIEW_RATE_LIMIT_PER_MINUTE), got: {result:?}"
    );
}

#[test]
fn build_app_config_paths_override() {
    let mut map = HashMap::new();
    map.insert("RICHVIEW_STORES_PATH", "/etc/richview/stores.yaml");
    map.insert("RICHVIEW_CART_DIR", "/var/lib/richview");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.stores_path.to_str(), Some("/etc/richview/stores.yaml"));
    assert_eq!(cfg.cart_dir.to_str(), Some("/var/lib/richview"));
}

#[test]
fn debug_output_redacts_secret() {
    let mut map = HashMap::new();
    map.insert("PAYSTACK_SECRET_KEY", "sk_live_very_secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("sk_live_very_secret"));
    assert!(debug.contains("[redacted]"));
}
