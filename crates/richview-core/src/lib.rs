pub mod app_config;
pub mod cart;
pub mod config;
pub mod currency;
pub mod products;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    CartError, CartItem, CartStorage, CartStore, FileCartStorage, MemoryCartStorage, NewCartItem,
    CART_STORAGE_KEY,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use currency::format_subunits;
pub use products::Product;
pub use stores::{load_stores, Store, StoreDirectory};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("stores validation failed: {0}")]
    Validation(String),
}
