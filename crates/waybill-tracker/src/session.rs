//! One tracking view: the active shipment's checkpoints and animation.
//!
//! Every [`ShipmentTracker::load`] starts a new lookup generation. Results of
//! an older lookup that finish after a newer one started are thrown away, and
//! the old animation is cancelled before the new pipeline begins.

use std::sync::Mutex;

use tokio::sync::watch;
use waybill_core::{Checkpoint, ShipmentRecord};
use waybill_geocode::GeocodeLookup;

use crate::animation::driver::{spawn_animation, AnimationHandle};
use crate::animation::{AnimationConfig, Frame, RouteAnimator};
use crate::guard::Generation;
use crate::pipeline::CheckpointPipeline;

/// Result of [`ShipmentTracker::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Checkpoints were installed and a fresh animation started.
    Ready { checkpoints: Vec<Checkpoint> },
    /// Nothing could be resolved; the view shows "no tracking data".
    NoData,
    /// A newer `load` started before this one finished.
    Superseded,
}

struct ActiveShipment {
    awb: String,
    checkpoints: Vec<Checkpoint>,
    animation: AnimationHandle,
}

pub struct ShipmentTracker<G> {
    pipeline: CheckpointPipeline<G>,
    animation_config: AnimationConfig,
    generation: Generation,
    active: Mutex<Option<ActiveShipment>>,
}

impl<G: GeocodeLookup> ShipmentTracker<G> {
    #[must_use]
    pub fn new(pipeline: CheckpointPipeline<G>, animation_config: AnimationConfig) -> Self {
        Self {
            pipeline,
            animation_config,
            generation: Generation::new(),
            active: Mutex::new(None),
        }
    }

    /// Replaces the displayed shipment with `record`.
    ///
    /// Must be called from within a tokio runtime; the animation task is
    /// spawned on it.
    pub async fn load(&self, record: &ShipmentRecord) -> LoadOutcome {
        let guard = self.generation.advance();
        self.clear();

        let Some(checkpoints) = self.pipeline.run_guarded(record, &guard).await else {
            return LoadOutcome::Superseded;
        };

        let mut active = self.lock_active();
        if guard.is_stale() {
            return LoadOutcome::Superseded;
        }
        if checkpoints.is_empty() {
            tracing::info!(awb = %record.awb, "no tracking data available");
            *active = None;
            return LoadOutcome::NoData;
        }

        let animator = RouteAnimator::new(checkpoints.clone(), self.animation_config);
        *active = Some(ActiveShipment {
            awb: record.awb.clone(),
            checkpoints: checkpoints.clone(),
            animation: spawn_animation(animator),
        });
        LoadOutcome::Ready { checkpoints }
    }

    /// Stops the animation and forgets the displayed shipment.
    pub fn clear(&self) {
        if let Some(previous) = self.lock_active().take() {
            tracing::debug!(awb = %previous.awb, "animation cancelled");
        }
    }

    #[must_use]
    pub fn awb(&self) -> Option<String> {
        self.lock_active().as_ref().map(|a| a.awb.clone())
    }

    #[must_use]
    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        self.lock_active()
            .as_ref()
            .map(|a| a.checkpoints.clone())
            .unwrap_or_default()
    }

    /// Frame feed of the active animation, if any.
    #[must_use]
    pub fn frames(&self) -> Option<watch::Receiver<Frame>> {
        self.lock_active().as_ref().map(|a| a.animation.frames())
    }

    /// Returns `false` when no shipment is displayed.
    pub fn select(&self, checkpoint_id: usize) -> bool {
        match self.lock_active().as_ref() {
            Some(active) => {
                active.animation.select(checkpoint_id);
                true
            }
            None => false,
        }
    }

    pub fn deselect(&self) {
        if let Some(active) = self.lock_active().as_ref() {
            active.animation.deselect();
        }
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveShipment>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
