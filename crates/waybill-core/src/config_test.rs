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
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.tracking_api_url, "http://localhost:5000");
    assert_eq!(cfg.tracking_timeout_secs, 30);
    assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.geocoder_user_agent, "waybill/0.1 (shipment-tracking)");
    assert!(cfg.geocoder_email.is_none());
    assert_eq!(cfg.geocoder_timeout_secs, 10);
    assert_eq!(cfg.geocoder_delay_ms, 100);
    assert_eq!(cfg.geocoder_max_retries, 2);
    assert_eq!(cfg.geocoder_backoff_base_ms, 500);
    assert!(cfg.geocode_cache);
    assert_eq!(cfg.sampling_small_timeline_max, 5);
    assert_eq!(cfg.sampling_stride, 3);
    assert_eq!(cfg.animation_duration_ms, 4000);
    assert_eq!(cfg.animation_steps, 120);
    assert!(cfg.locations_path.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_ENV", "production");
    map.insert("WAYBILL_GEOCODER_DELAY_MS", "1000");
    map.insert("WAYBILL_GEOCODE_CACHE", "FALSE");
    map.insert("WAYBILL_SAMPLING_STRIDE", "2");
    map.insert("WAYBILL_LOCATIONS_PATH", "./config/locations.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.geocoder_delay_ms, 1000);
    assert!(!cfg.geocode_cache);
    assert_eq!(cfg.sampling_stride, 2);
    assert_eq!(
        cfg.locations_path.as_deref(),
        Some(std::path::Path::new("./config/locations.yaml"))
    );
}

#[test]
fn build_app_config_rejects_non_numeric_delay() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_GEOCODER_DELAY_MS", "fast");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WAYBILL_GEOCODER_DELAY_MS"),
        "expected InvalidEnvVar(WAYBILL_GEOCODER_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_stride() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_SAMPLING_STRIDE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WAYBILL_SAMPLING_STRIDE"),
        "expected InvalidEnvVar(WAYBILL_SAMPLING_STRIDE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_animation_steps() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_ANIMATION_STEPS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WAYBILL_ANIMATION_STEPS"
    ));
}

#[test]
fn build_app_config_ignores_blank_email() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_GEOCODER_EMAIL", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.geocoder_email.is_none());
}

#[test]
fn debug_redacts_geocoder_email() {
    let mut map = HashMap::new();
    map.insert("WAYBILL_GEOCODER_EMAIL", "ops@example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("ops@example.com"));
    assert!(rendered.contains("[redacted]"));
}
