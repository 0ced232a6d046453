//! Boundary data model shared by every waybill crate.
//!
//! [`ShipmentRecord`] mirrors the JSON returned by the tracking endpoint and is
//! accepted as-is. [`Checkpoint`] is the resolved unit handed to map renderers.

use serde::{Deserialize, Serialize};

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both components are finite and inside the
    /// latitude `[-90, 90]` / longitude `[-180, 180]` ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.lat)
            && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }

    /// `[lat, lng]` pair as expected by most map libraries.
    #[must_use]
    pub const fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// One carrier event as reported by the tracking endpoint.
///
/// `completed` is the carrier's own bookkeeping and may disagree with the
/// chronology implied by `date`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub completed: bool,
}

/// A coordinate component that may arrive as a JSON number, a numeric string,
/// or something else entirely (booleans, objects) that is kept only to be
/// rejected later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    #[serde(skip_serializing)]
    Other(serde::de::IgnoredAny),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
            LooseNumber::Other(_) => None,
        }
    }
}

/// An origin or destination point exactly as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WirePoint {
    #[serde(default)]
    pub lat: Option<LooseNumber>,
    #[serde(default)]
    pub lng: Option<LooseNumber>,
}

impl WirePoint {
    /// Converts to validated [`Coordinates`].
    ///
    /// Returns `None` when a component is missing, non-numeric, non-finite, or
    /// out of range.
    #[must_use]
    pub fn to_coordinates(&self) -> Option<Coordinates> {
        let lat = self.lat.as_ref()?.as_f64()?;
        let lng = self.lng.as_ref()?.as_f64()?;
        let coords = Coordinates::new(lat, lng);
        coords.is_valid().then_some(coords)
    }
}

impl From<Coordinates> for WirePoint {
    fn from(c: Coordinates) -> Self {
        Self {
            lat: Some(LooseNumber::Number(c.lat)),
            lng: Some(LooseNumber::Number(c.lng)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteCoordinates {
    #[serde(default)]
    pub origin: Option<WirePoint>,
    #[serde(default)]
    pub destination: Option<WirePoint>,
}

/// Validated origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEndpoints {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

/// A shipment as returned by the tracking endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    pub awb: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub timeline: Vec<RawEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<RouteCoordinates>,
}

impl ShipmentRecord {
    /// Returns the validated origin and destination, or `None` if either is
    /// missing or invalid. No checkpoints can be produced without both.
    #[must_use]
    pub fn endpoints(&self) -> Option<RouteEndpoints> {
        let coords = self.coordinates.as_ref()?;
        let origin = coords.origin.as_ref()?.to_coordinates()?;
        let destination = coords.destination.as_ref()?.to_coordinates()?;
        Some(RouteEndpoints {
            origin,
            destination,
        })
    }
}

/// A raw event resolved to a validated coordinate.
///
/// `id` is the event's index in the reconciled timeline, so ids stay stable
/// even when neighbouring events are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: usize,
    pub status: String,
    pub location: String,
    pub date: String,
    pub completed: bool,
    pub coordinates: Coordinates,
    pub is_first: bool,
    pub is_last: bool,
}
