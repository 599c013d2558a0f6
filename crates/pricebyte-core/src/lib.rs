mod app_config;
mod config;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StoreApiConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{NutritionInfo, PriceHistoryEntry, Product, SearchResponse, StoreProduct};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
