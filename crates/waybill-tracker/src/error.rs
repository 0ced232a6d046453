use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to read location tables from {path}: {source}")]
    LocationTablesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid location tables{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    LocationTablesParse {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid sampling policy: {0}")]
    InvalidSamplingPolicy(String),

    #[error("invalid animation config: {0}")]
    InvalidAnimationConfig(String),
}
