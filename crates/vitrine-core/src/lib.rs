mod app_config;
mod config;
mod product;
mod theme;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_SHEET_URL};
pub use product::{slugify, ProductRecord};
pub use theme::ThemePreference;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
