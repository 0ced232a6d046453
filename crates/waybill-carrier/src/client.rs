//! HTTP client for the shipment tracking endpoint (`POST /track`).

use std::time::Duration;

use reqwest::{Client, Url};
use waybill_core::ShipmentRecord;

use crate::error::CarrierError;
use crate::normalize::normalize_response;
use crate::types::{ErrorBody, Provider, TrackRequest, TrackResponse};

/// Client for the tracking endpoint that fronts the carrier scrapers.
pub struct TrackingClient {
    client: Client,
    base_url: Url,
}

impl TrackingClient {
    /// # Errors
    ///
    /// Returns [`CarrierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CarrierError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, CarrierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("waybill/0.1 (shipment-tracking)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CarrierError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Looks up `awb` with the given carrier and returns the normalized record.
    ///
    /// # Errors
    ///
    /// - [`CarrierError::MissingAwb`] if `awb` is blank.
    /// - [`CarrierError::Api`] if the endpoint answers non-2xx with an error body.
    /// - [`CarrierError::UnexpectedStatus`] for any other non-2xx response.
    /// - [`CarrierError::Http`] on network failure.
    /// - [`CarrierError::Deserialize`] if a 2xx body does not match the contract.
    pub async fn track(
        &self,
        awb: &str,
        provider: Provider,
    ) -> Result<ShipmentRecord, CarrierError> {
        let awb = awb.trim();
        if awb.is_empty() {
            return Err(CarrierError::MissingAwb);
        }

        let url = self.track_url()?;
        tracing::info!(awb, %provider, "requesting shipment tracking");

        let response = self
            .client
            .post(url.clone())
            .json(&TrackRequest { awb, provider })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => CarrierError::Api {
                    status: status.as_u16(),
                    message: err.error,
                },
                Err(_) => CarrierError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                },
            });
        }

        let parsed = serde_json::from_str::<TrackResponse>(&body).map_err(|e| {
            CarrierError::Deserialize {
                context: format!("track(awb={awb}, provider={provider})"),
                source: e,
            }
        })?;

        let record = normalize_response(parsed, awb);
        tracing::debug!(
            awb = %record.awb,
            events = record.timeline.len(),
            "tracking response normalized"
        );
        Ok(record)
    }

    fn track_url(&self) -> Result<Url, CarrierError> {
        self.base_url
            .join("track")
            .map_err(|e| CarrierError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}
