use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Bearer secret for the payment provider's catalog API. Catalog routes
    /// answer 500 when this is absent rather than failing startup.
    pub paystack_secret_key: Option<String>,
    pub catalog_base_url: String,
    pub catalog_timeout_secs: u64,
    pub catalog_user_agent: String,
    pub catalog_max_retries: u32,
    pub catalog_backoff_base_secs: u64,
    pub stores_path: PathBuf,
    pub cart_dir: PathBuf,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "paystack_secret_key",
                &self.paystack_secret_key.as_ref().map(|_| "[redacted]"),
            )
            .field("catalog_base_url", &self.catalog_base_url)
            .field("catalog_timeout_secs", &self.catalog_timeout_secs)
            .field("catalog_user_agent", &self.catalog_user_agent)
            .field("catalog_max_retries", &self.catalog_max_retries)
            .field("catalog_backoff_base_secs", &self.catalog_backoff_base_secs)
            .field("stores_path", &self.stores_path)
            .field("cart_dir", &self.cart_dir)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
