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
    pub log_level: String,
    pub tracking_api_url: String,
    pub tracking_timeout_secs: u64,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_email: Option<String>,
    pub geocoder_timeout_secs: u64,
    pub geocoder_delay_ms: u64,
    pub geocoder_max_retries: u32,
    pub geocoder_backoff_base_ms: u64,
    pub geocode_cache: bool,
    pub sampling_small_timeline_max: usize,
    pub sampling_stride: usize,
    pub animation_duration_ms: u64,
    pub animation_steps: u32,
    pub locations_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("tracking_api_url", &self.tracking_api_url)
            .field("tracking_timeout_secs", &self.tracking_timeout_secs)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field(
                "geocoder_email",
                &self.geocoder_email.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_delay_ms", &self.geocoder_delay_ms)
            .field("geocoder_max_retries", &self.geocoder_max_retries)
            .field("geocoder_backoff_base_ms", &self.geocoder_backoff_base_ms)
            .field("geocode_cache", &self.geocode_cache)
            .field(
                "sampling_small_timeline_max",
                &self.sampling_small_timeline_max,
            )
            .field("sampling_stride", &self.sampling_stride)
            .field("animation_duration_ms", &self.animation_duration_ms)
            .field("animation_steps", &self.animation_steps)
            .field("locations_path", &self.locations_path)
            .finish()
    }
}
