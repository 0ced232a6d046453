//! Route geometry handed to map renderers alongside the checkpoints.

use serde::Serialize;
use waybill_core::{Checkpoint, Coordinates};

pub const DEFAULT_CURVE_POINTS: usize = 60;

const CURVE_OFFSET_RATIO: f64 = 0.2;

/// How a checkpoint marker should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    Completed,
    Current,
    Pending,
}

/// `[lat, lng]` polyline through every checkpoint.
#[must_use]
pub fn route_line(checkpoints: &[Checkpoint]) -> Vec<[f64; 2]> {
    checkpoints.iter().map(|cp| cp.coordinates.as_pair()).collect()
}

/// The travelled part of the route: checkpoints up to and including
/// `current_index`.
#[must_use]
pub fn completed_route_line(checkpoints: &[Checkpoint], current_index: usize) -> Vec<[f64; 2]> {
    let end = current_index.saturating_add(1).min(checkpoints.len());
    route_line(&checkpoints[..end])
}

/// Marker style for the checkpoint at `index`.
///
/// A completed checkpoint is always `Completed`. Once the whole route is
/// completed nothing is `Current`.
#[must_use]
pub fn marker_status(checkpoints: &[Checkpoint], index: usize, current_index: usize) -> MarkerStatus {
    let Some(checkpoint) = checkpoints.get(index) else {
        return MarkerStatus::Pending;
    };
    if checkpoint.completed {
        return MarkerStatus::Completed;
    }
    let delivered = checkpoints.iter().all(|cp| cp.completed);
    if !delivered && index == current_index {
        MarkerStatus::Current
    } else {
        MarkerStatus::Pending
    }
}

/// Quadratic Bézier arc from `start` to `end` sampled at `points + 1`
/// positions, bowed by a control point 20 % of the chord length off the
/// midpoint.
#[must_use]
pub fn curved_route(start: Coordinates, end: Coordinates, points: usize) -> Vec<[f64; 2]> {
    let lat_diff = end.lat - start.lat;
    let lng_diff = end.lng - start.lng;
    let mid = route_center(start, end);
    let offset = lat_diff.hypot(lng_diff) * CURVE_OFFSET_RATIO;
    let angle = lng_diff.atan2(lat_diff);
    let control = Coordinates::new(mid.lat + offset * angle.cos(), mid.lng - offset * angle.sin());

    let points = points.max(1);
    #[allow(clippy::cast_precision_loss)]
    let total = points as f64;
    (0..=points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / total;
            let u = 1.0 - t;
            [
                u * u * start.lat + 2.0 * u * t * control.lat + t * t * end.lat,
                u * u * start.lng + 2.0 * u * t * control.lng + t * t * end.lng,
            ]
        })
        .collect()
}

/// Arithmetic midpoint of two coordinates, used as the default map centre.
#[must_use]
pub fn route_center(origin: Coordinates, destination: Coordinates) -> Coordinates {
    Coordinates::new(
        (origin.lat + destination.lat) / 2.0,
        (origin.lng + destination.lng) / 2.0,
    )
}
