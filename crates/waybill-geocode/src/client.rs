//! HTTP client for the Nominatim `/search` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use waybill_core::Coordinates;

use crate::error::GeocodeError;
use crate::rate_limit::{retry_with_backoff, Throttle};
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Connection and politeness settings for [`NominatimClient`].
#[derive(Debug, Clone)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Contact address forwarded as `email=`, recommended by the usage policy.
    pub email: Option<String>,
    pub timeout_secs: u64,
    /// Fixed minimum spacing between requests to this endpoint.
    pub min_interval: Duration,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: "waybill/0.1 (shipment-tracking)".to_owned(),
            email: None,
            timeout_secs: 10,
            min_interval: Duration::from_millis(100),
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl GeocoderSettings {
    #[must_use]
    pub fn from_app_config(config: &waybill_core::AppConfig) -> Self {
        Self {
            base_url: config.geocoder_base_url.clone(),
            user_agent: config.geocoder_user_agent.clone(),
            email: config.geocoder_email.clone(),
            timeout_secs: config.geocoder_timeout_secs,
            min_interval: Duration::from_millis(config.geocoder_delay_ms),
            max_retries: config.geocoder_max_retries,
            backoff_base_ms: config.geocoder_backoff_base_ms,
        }
    }
}

/// Client for a Nominatim-compatible geocoder.
///
/// Every request, including retries, passes through one [`Throttle`], so the
/// configured spacing holds no matter how many tasks share the client.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    email: Option<String>,
    throttle: Throttle,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `settings.base_url` does not parse.
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;

        // Exactly one trailing slash so `join("search")` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            email: settings.email.clone(),
            throttle: Throttle::new(settings.min_interval),
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Looks up the single best match for `query`.
    ///
    /// Returns `Ok(None)` when the geocoder has no result. Range validation
    /// is left to the caller; only non-numeric values are rejected here.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::RateLimited`] on HTTP 429 after all retries.
    /// - [`GeocodeError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`GeocodeError::Http`] on network failure after all retries.
    /// - [`GeocodeError::Deserialize`] if the body is not a JSON array of places.
    /// - [`GeocodeError::InvalidCoordinates`] if `lat`/`lon` are not numbers.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.search_url(query)?;

        let places = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                self.throttle.wait().await;
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(GeocodeError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(GeocodeError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<Vec<NominatimPlace>>(&body).map_err(|e| {
                    GeocodeError::Deserialize {
                        context: format!("search(q={query})"),
                        source: e,
                    }
                })
            }
        })
        .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let lat = place.lat.trim().parse::<f64>();
        let lng = place.lon.trim().parse::<f64>();
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => Ok(Some(Coordinates::new(lat, lng))),
            _ => Err(GeocodeError::InvalidCoordinates {
                query: query.to_owned(),
                lat: place.lat,
                lon: place.lon,
            }),
        }
    }

    /// Builds the `/search` URL with percent-encoded query parameters.
    pub(crate) fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("q", query);
            pairs.append_pair("limit", "1");
            if let Some(email) = &self.email {
                pairs.append_pair("email", email);
            }
        }
        Ok(url)
    }
}
