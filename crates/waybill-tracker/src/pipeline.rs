//! Shipment record → checkpoints: validate endpoints, reconcile, resolve.

use futures::StreamExt;
use waybill_core::{Checkpoint, ShipmentRecord};
use waybill_geocode::GeocodeLookup;

use crate::guard::StaleGuard;
use crate::reconcile::reconcile_with_policy;
use crate::resolve::CheckpointResolver;

pub struct CheckpointPipeline<G> {
    resolver: CheckpointResolver<G>,
}

impl<G: GeocodeLookup> CheckpointPipeline<G> {
    #[must_use]
    pub fn new(resolver: CheckpointResolver<G>) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &CheckpointResolver<G> {
        &self.resolver
    }

    /// Runs the full pipeline for one shipment.
    ///
    /// Returns an empty list when the record has no valid origin/destination.
    /// With a deterministic geocoder the output is identical across runs.
    pub async fn run(&self, record: &ShipmentRecord) -> Vec<Checkpoint> {
        self.run_guarded(record, &StaleGuard::detached())
            .await
            .unwrap_or_default()
    }

    /// Like [`CheckpointPipeline::run`], but returns `None` when `guard`
    /// went stale before the run finished. Partial results are discarded.
    pub async fn run_guarded(
        &self,
        record: &ShipmentRecord,
        guard: &StaleGuard,
    ) -> Option<Vec<Checkpoint>> {
        let Some(endpoints) = record.endpoints() else {
            tracing::error!(
                awb = %record.awb,
                "shipment has missing or invalid origin/destination coordinates"
            );
            return Some(Vec::new());
        };

        let reconciled = reconcile_with_policy(&record.timeline);
        tracing::info!(
            awb = %record.awb,
            generation = guard.generation(),
            events = reconciled.events.len(),
            order = ?reconciled.order,
            "resolving checkpoints"
        );

        let checkpoints: Vec<Checkpoint> = self
            .resolver
            .resolve_stream(&reconciled.events, endpoints, guard)
            .collect()
            .await;

        if guard.is_stale() {
            tracing::info!(
                awb = %record.awb,
                generation = guard.generation(),
                "lookup superseded, discarding checkpoints"
            );
            return None;
        }

        tracing::info!(
            awb = %record.awb,
            events = reconciled.events.len(),
            checkpoints = checkpoints.len(),
            "checkpoints resolved"
        );
        Some(checkpoints)
    }
}
