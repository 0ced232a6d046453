//! Checkpoint resolution: reconciled events → validated, geocoded checkpoints.
//!
//! The first event is pinned to the shipment origin and the last to the
//! destination, whatever their location text says. Middle events are
//! geocoded only when the sampling policy selects them; anything that cannot
//! be resolved to valid coordinates is dropped.

use std::sync::Arc;

use futures::future;
use futures::stream::{self, Stream, StreamExt};
use waybill_core::{AppConfig, Checkpoint, Coordinates, RawEvent, RouteEndpoints};
use waybill_geocode::GeocodeLookup;

use crate::error::TrackerError;
use crate::guard::StaleGuard;
use crate::locations::LocationTables;
use crate::normalize::classify_location;

/// Decides which middle events are worth a geocoder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    small_timeline_max: usize,
    stride: usize,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            small_timeline_max: 5,
            stride: 3,
        }
    }
}

impl SamplingPolicy {
    /// Timelines with at most `small_timeline_max` events geocode every middle
    /// event; longer ones only those whose index is a multiple of `stride`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidSamplingPolicy`] if `stride` is zero.
    pub fn new(small_timeline_max: usize, stride: usize) -> Result<Self, TrackerError> {
        if stride == 0 {
            return Err(TrackerError::InvalidSamplingPolicy(
                "stride must be greater than zero".to_owned(),
            ));
        }
        Ok(Self {
            small_timeline_max,
            stride,
        })
    }

    /// # Errors
    ///
    /// See [`SamplingPolicy::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, TrackerError> {
        Self::new(config.sampling_small_timeline_max, config.sampling_stride)
    }

    #[must_use]
    pub fn small_timeline_max(&self) -> usize {
        self.small_timeline_max
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn should_geocode(&self, index: usize, len: usize) -> bool {
        len <= self.small_timeline_max || index % self.stride == 0
    }
}

/// What the resolver does with the event at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRole {
    /// Pinned to the shipment origin.
    Origin,
    /// Pinned to the shipment destination.
    Destination,
    /// A middle event, geocoded only if `geocode` is set.
    Intermediate { geocode: bool },
}

impl EventRole {
    /// Classifies position `index` of a timeline of `len` events.
    ///
    /// A single-event timeline is its own origin.
    #[must_use]
    pub fn classify(index: usize, len: usize, sampling: &SamplingPolicy) -> Self {
        if index == 0 {
            EventRole::Origin
        } else if index + 1 == len {
            EventRole::Destination
        } else {
            EventRole::Intermediate {
                geocode: sampling.should_geocode(index, len),
            }
        }
    }
}

/// Turns a reconciled timeline into checkpoints using a [`GeocodeLookup`].
pub struct CheckpointResolver<G> {
    geocoder: G,
    sampling: SamplingPolicy,
    tables: Arc<LocationTables>,
}

impl<G: GeocodeLookup> CheckpointResolver<G> {
    /// Resolver with the default sampling policy and built-in location tables.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            sampling: SamplingPolicy::default(),
            tables: Arc::new(LocationTables::builtin().clone()),
        }
    }

    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    #[must_use]
    pub fn with_tables(mut self, tables: Arc<LocationTables>) -> Self {
        self.tables = tables;
        self
    }

    #[must_use]
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    #[must_use]
    pub fn sampling(&self) -> SamplingPolicy {
        self.sampling
    }

    /// Resolves `events` (already reconciled) against the shipment endpoints.
    ///
    /// Returns an empty list if `origin` or `destination` is not a valid
    /// coordinate. Per-event failures only drop that event.
    pub async fn resolve(
        &self,
        events: &[RawEvent],
        origin: Coordinates,
        destination: Coordinates,
    ) -> Vec<Checkpoint> {
        if !origin.is_valid() || !destination.is_valid() {
            tracing::error!(
                origin_lat = origin.lat,
                origin_lng = origin.lng,
                destination_lat = destination.lat,
                destination_lng = destination.lng,
                "invalid route endpoints, no checkpoints can be resolved"
            );
            return Vec::new();
        }

        let endpoints = RouteEndpoints {
            origin,
            destination,
        };
        let guard = StaleGuard::detached();
        self.resolve_stream(events, endpoints, &guard)
            .collect()
            .await
    }

    /// Lazily resolves events in order, one geocoder call at a time.
    ///
    /// The stream ends early, without issuing further lookups, as soon as
    /// `guard` goes stale, and a lookup already in flight is abandoned.
    /// `endpoints` must already be validated.
    pub fn resolve_stream<'a>(
        &'a self,
        events: &'a [RawEvent],
        endpoints: RouteEndpoints,
        guard: &'a StaleGuard,
    ) -> impl Stream<Item = Checkpoint> + 'a {
        let len = events.len();
        stream::iter(events.iter().enumerate())
            .take_while(move |_| future::ready(guard.is_current()))
            .then(move |(index, event)| self.resolve_event(index, len, event, endpoints, guard))
            .filter_map(future::ready)
    }

    async fn resolve_event(
        &self,
        index: usize,
        len: usize,
        event: &RawEvent,
        endpoints: RouteEndpoints,
        guard: &StaleGuard,
    ) -> Option<Checkpoint> {
        let coordinates = match EventRole::classify(index, len, &self.sampling) {
            EventRole::Origin => {
                tracing::debug!(index, location = %event.location, "pinned to origin");
                endpoints.origin
            }
            EventRole::Destination => {
                tracing::debug!(index, location = %event.location, "pinned to destination");
                endpoints.destination
            }
            EventRole::Intermediate { geocode: false } => {
                tracing::debug!(index, location = %event.location, "skipped by sampling policy");
                return None;
            }
            EventRole::Intermediate { geocode: true } => {
                self.geocode_event(index, event, guard).await?
            }
        };

        Some(Checkpoint {
            id: index,
            status: event.status.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            completed: event.completed,
            coordinates,
            is_first: index == 0,
            is_last: index + 1 == len,
        })
    }

    async fn geocode_event(
        &self,
        index: usize,
        event: &RawEvent,
        guard: &StaleGuard,
    ) -> Option<Coordinates> {
        let normalized = classify_location(&event.location, &self.tables);
        if normalized.query.is_empty() {
            tracing::debug!(index, location = %event.location, "nothing to geocode");
            return None;
        }

        let coords = tokio::select! {
            biased;
            () = guard.superseded() => {
                tracing::debug!(
                    index,
                    query = %normalized.query,
                    generation = guard.generation(),
                    "lookup superseded, abandoning geocoder call"
                );
                return None;
            }
            found = self.geocoder.lookup(&normalized.query) => found?,
        };

        if !coords.is_valid() {
            tracing::warn!(
                index,
                query = %normalized.query,
                lat = coords.lat,
                lng = coords.lng,
                "geocoder returned out-of-range coordinates"
            );
            return None;
        }

        tracing::debug!(
            index,
            query = %normalized.query,
            rule = ?normalized.rule,
            "checkpoint geocoded"
        );
        Some(coords)
    }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
