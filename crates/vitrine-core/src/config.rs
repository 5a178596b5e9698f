use chrono::FixedOffset;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// The published catalog sheet, used when `VITRINE_SHEET_URL` is unset.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQZ1xVGIGNd7LrPMDWa3uFM_i9MVgzj1LmqKCqZrVUM3F203ZPJ4hWugKGUNaNMsmRhn__bVHfeGk_w/pub?output=csv";

/// Reads `VITRINE_*` settings, loading a `.env` file first if one exists.
///
/// # Errors
///
/// Returns `ConfigError` if a setting cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a setting cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let sheet_url = lookup("VITRINE_SHEET_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHEET_URL.to_string());
    if !(sheet_url.starts_with("http://") || sheet_url.starts_with("https://")) {
        return Err(invalid(
            "VITRINE_SHEET_URL",
            "expected an http(s) URL".to_string(),
        ));
    }

    let env = parse_environment(&or_default("VITRINE_ENV", "development"))?;

    let bind_addr = or_default("VITRINE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("VITRINE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");
    let state_path = PathBuf::from(or_default("VITRINE_STATE_PATH", "./data/state.json"));

    let request_timeout_secs = parse_u64("VITRINE_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("VITRINE_USER_AGENT", "vitrine/0.1 (catalog)");

    let display_offset = parse_offset(&or_default("VITRINE_DISPLAY_UTC_OFFSET_HOURS", "-3"))?;

    let redirect_delay_ms = parse_u64("VITRINE_REDIRECT_DELAY_MS", "1200")?;
    let redirect_hide_ms = parse_u64("VITRINE_REDIRECT_HIDE_MS", "500")?;

    let countdown_tick_ms = parse_u64("VITRINE_COUNTDOWN_TICK_MS", "1000")?;
    if countdown_tick_ms == 0 {
        return Err(invalid(
            "VITRINE_COUNTDOWN_TICK_MS",
            "tick period must be greater than zero".to_string(),
        ));
    }

    let toast_min_secs = parse_u64("VITRINE_TOAST_MIN_SECS", "12")?;
    let toast_max_secs = parse_u64("VITRINE_TOAST_MAX_SECS", "25")?;
    if toast_min_secs == 0 || toast_min_secs > toast_max_secs {
        return Err(invalid(
            "VITRINE_TOAST_MIN_SECS",
            format!("expected 0 < min <= max ({toast_max_secs}), got {toast_min_secs}"),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sheet_url,
        state_path,
        request_timeout_secs,
        user_agent,
        display_offset,
        redirect_delay_ms,
        redirect_hide_ms,
        countdown_tick_ms,
        toast_min_secs,
        toast_max_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parse a whole-hour UTC offset such as `"-3"` or `"+1"`.
fn parse_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "VITRINE_DISPLAY_UTC_OFFSET_HOURS".to_string(),
        reason,
    };
    let hours = s
        .trim()
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|e| invalid(e.to_string()))?;
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid(format!("offset {hours}h out of range")))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
