use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_with(var, &or_default(var, default))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_with(var, &or_default(var, default))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        parse_with(var, &or_default(var, default))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_with(var, &or_default(var, default).to_ascii_lowercase())
    };

    let non_zero = |var: &str, is_zero: bool| -> Result<(), ConfigError> {
        if is_zero {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    };

    let env = parse_environment(&or_default("WAYBILL_ENV", "development"));
    let log_level = or_default("WAYBILL_LOG_LEVEL", "info");

    let tracking_api_url = or_default("WAYBILL_TRACKING_API_URL", "http://localhost:5000");
    let tracking_timeout_secs = parse_u64("WAYBILL_TRACKING_TIMEOUT_SECS", "30")?;

    let geocoder_base_url = or_default(
        "WAYBILL_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent = or_default(
        "WAYBILL_GEOCODER_USER_AGENT",
        "waybill/0.1 (shipment-tracking)",
    );
    let geocoder_email = lookup("WAYBILL_GEOCODER_EMAIL")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let geocoder_timeout_secs = parse_u64("WAYBILL_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_delay_ms = parse_u64("WAYBILL_GEOCODER_DELAY_MS", "100")?;
    let geocoder_max_retries = parse_u32("WAYBILL_GEOCODER_MAX_RETRIES", "2")?;
    let geocoder_backoff_base_ms = parse_u64("WAYBILL_GEOCODER_BACKOFF_BASE_MS", "500")?;
    let geocode_cache = parse_bool("WAYBILL_GEOCODE_CACHE", "true")?;

    let sampling_small_timeline_max = parse_usize("WAYBILL_SAMPLING_SMALL_TIMELINE_MAX", "5")?;
    let sampling_stride = parse_usize("WAYBILL_SAMPLING_STRIDE", "3")?;
    non_zero("WAYBILL_SAMPLING_STRIDE", sampling_stride == 0)?;

    let animation_duration_ms = parse_u64("WAYBILL_ANIMATION_DURATION_MS", "4000")?;
    non_zero("WAYBILL_ANIMATION_DURATION_MS", animation_duration_ms == 0)?;
    let animation_steps = parse_u32("WAYBILL_ANIMATION_STEPS", "120")?;
    non_zero("WAYBILL_ANIMATION_STEPS", animation_steps == 0)?;

    let locations_path = lookup("WAYBILL_LOCATIONS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        tracking_api_url,
        tracking_timeout_secs,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_email,
        geocoder_timeout_secs,
        geocoder_delay_ms,
        geocoder_max_retries,
        geocoder_backoff_base_ms,
        geocode_cache,
        sampling_small_timeline_max,
        sampling_stride,
        animation_duration_ms,
        animation_steps,
        locations_path,
    })
}

/// Parse a trimmed env-var value, mapping failures to [`ConfigError::InvalidEnvVar`].
fn parse_with<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
