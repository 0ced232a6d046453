use thiserror::Error;

/// Errors returned by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by geocoder (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("geocoder returned non-numeric coordinates for \"{query}\": lat={lat}, lon={lon}")]
    InvalidCoordinates {
        query: String,
        lat: String,
        lon: String,
    },

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
