use thiserror::Error;

/// Errors returned by the tracking endpoint client.
#[derive(Debug, Error)]
pub enum CarrierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status and a JSON `{"error": ...}` body.
    #[error("tracking API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tracking API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("unknown carrier provider \"{0}\"")]
    UnknownProvider(String),

    #[error("AWB number is empty")]
    MissingAwb,
}
