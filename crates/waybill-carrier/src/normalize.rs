//! Normalization of tracking endpoint responses into [`ShipmentRecord`]s.

use waybill_core::{RawEvent, ShipmentRecord};

use crate::types::{TrackResponse, WireEvent};

const FALLBACK_STATUS: &str = "Update";

/// First candidate that is present and not blank.
fn first_non_empty<'a>(candidates: &[Option<&'a String>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.as_str())
        .find(|s| !s.trim().is_empty())
}

/// Converts one loose timeline entry into a [`RawEvent`].
///
/// Entries without an explicit `completed` flag are treated as completed:
/// the endpoint only reports scans that already happened.
#[must_use]
pub fn normalize_event(event: &WireEvent) -> RawEvent {
    let status = first_non_empty(&[event.activity.as_ref(), event.status.as_ref()])
        .unwrap_or(FALLBACK_STATUS);
    let date = first_non_empty(&[
        event.date_time.as_ref(),
        event.date.as_ref(),
        event.time.as_ref(),
    ])
    .unwrap_or_default();

    RawEvent {
        status: status.to_owned(),
        location: event.location.clone().unwrap_or_default(),
        date: date.to_owned(),
        completed: event.completed.unwrap_or(true),
    }
}

/// Converts a `POST /track` response into a [`ShipmentRecord`].
///
/// `requested_awb` is used when the endpoint omits the `awb` field. Timeline
/// order is preserved exactly; reordering is the reconciler's job.
#[must_use]
pub fn normalize_response(response: TrackResponse, requested_awb: &str) -> ShipmentRecord {
    let timeline = response.timeline.iter().map(normalize_event).collect();
    ShipmentRecord {
        awb: response
            .awb
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| requested_awb.to_owned()),
        status: response.status.unwrap_or_else(|| "Unknown".to_owned()),
        service: response.service,
        origin: response.origin,
        destination: response.destination,
        weight: response.weight,
        estimated_delivery: response.estimated_delivery,
        timeline,
        coordinates: response.coordinates,
    }
}
