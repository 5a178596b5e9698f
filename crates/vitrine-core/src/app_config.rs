use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::FixedOffset;

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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Published-to-web spreadsheet CSV endpoint.
    pub sheet_url: String,
    /// JSON key-value file holding favorites and theme preference.
    pub state_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Offset applied to expiry timestamps that carry no zone.
    pub display_offset: FixedOffset,
    pub redirect_delay_ms: u64,
    pub redirect_hide_ms: u64,
    pub countdown_tick_ms: u64,
    pub toast_min_secs: u64,
    pub toast_max_secs: u64,
}
