//! Wire types for the tracking endpoint.
//!
//! The endpoint wraps several carrier scrapers and their timelines are only
//! loosely aligned: the activity text may be under `activity` or `status`,
//! the timestamp under `date_time`, `date`, or `time`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use waybill_core::RouteCoordinates;

use crate::error::CarrierError;

/// Carriers the tracking endpoint knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    Atlantic,
    CourierWala,
    Dhl,
    #[default]
    FedEx,
    Icl,
    PxcPacific,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::Atlantic,
        Provider::CourierWala,
        Provider::Dhl,
        Provider::FedEx,
        Provider::Icl,
        Provider::PxcPacific,
    ];

    /// The exact name the endpoint expects in the request body.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Atlantic => "Atlantic",
            Provider::CourierWala => "Courier Wala",
            Provider::Dhl => "DHL",
            Provider::FedEx => "FedEx",
            Provider::Icl => "ICL",
            Provider::PxcPacific => "PXC Pacific",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CarrierError;

    /// Case-insensitive; spaces, dashes and underscores are ignored so
    /// `courier-wala`, `Courier Wala` and `COURIERWALA` all match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().replace(' ', "").to_ascii_lowercase() == key)
            .ok_or_else(|| CarrierError::UnknownProvider(s.to_owned()))
    }
}

impl Serialize for Provider {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Body of `POST /track`.
#[derive(Debug, Clone, Serialize)]
pub struct TrackRequest<'a> {
    pub awb: &'a str,
    pub provider: Provider,
}

/// One timeline entry as emitted by the endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireEvent {
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Successful `POST /track` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    #[serde(default)]
    pub awb: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub timeline: Vec<WireEvent>,
    #[serde(default)]
    pub coordinates: Option<RouteCoordinates>,
}

/// Non-2xx `POST /track` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
