//! Route animation: which leg the shipment is on, where the marker sits on
//! it, and where the map should look.
//!
//! [`RouteAnimator`] is a plain state machine advanced by [`RouteAnimator::tick`].
//! [`driver::spawn_animation`] runs it on a timer.

pub mod driver;

use std::time::Duration;

use serde::Serialize;
use waybill_core::{AppConfig, Checkpoint, Coordinates};

use crate::error::TrackerError;

pub const ANIMATING_ZOOM: u8 = 5;
pub const SELECTED_ZOOM: u8 = 6;

/// Loop duration and frame granularity of the leg animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    duration: Duration,
    steps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(4000),
            steps: 120,
        }
    }
}

impl AnimationConfig {
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidAnimationConfig`] if `duration` or
    /// `steps` is zero.
    pub fn new(duration: Duration, steps: u32) -> Result<Self, TrackerError> {
        if duration.is_zero() {
            return Err(TrackerError::InvalidAnimationConfig(
                "duration must be greater than zero".to_owned(),
            ));
        }
        if steps == 0 {
            return Err(TrackerError::InvalidAnimationConfig(
                "steps must be greater than zero".to_owned(),
            ));
        }
        Ok(Self { duration, steps })
    }

    /// # Errors
    ///
    /// See [`AnimationConfig::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, TrackerError> {
        Self::new(
            Duration::from_millis(config.animation_duration_ms),
            config.animation_steps,
        )
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Time between two frames.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.duration / self.steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnimationState {
    /// No checkpoints to show.
    Idle,
    /// Looping along the leg that starts at `current_index`.
    Animating { current_index: usize },
    /// Frozen on a user-selected checkpoint.
    Selected { checkpoint_id: usize },
}

/// Where the map should be centred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: [f64; 2],
    pub zoom: u8,
}

/// Everything a renderer needs to draw one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub position: Option<Coordinates>,
    /// Degrees clockwise from north, `[0, 360)`.
    pub bearing: f64,
    /// Position along the current leg, `[0, 1)`.
    pub progress: f64,
    pub current_index: Option<usize>,
    pub selected_index: Option<usize>,
    pub state: AnimationState,
    pub viewport: Option<Viewport>,
}

/// Index of the leg the shipment is on.
///
/// That is the last completed checkpoint before the first incomplete one.
/// When everything is completed the final leg (`len - 2`) keeps animating;
/// when nothing is, the shipment sits at the origin.
#[must_use]
pub fn current_index(checkpoints: &[Checkpoint]) -> usize {
    match checkpoints.iter().position(|cp| !cp.completed) {
        None => checkpoints.len().saturating_sub(2),
        Some(0) => 0,
        Some(first_pending) => first_pending - 1,
    }
}

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`.
///
/// Returns `0.0` if any component is not finite.
#[must_use]
pub fn bearing(from: Coordinates, to: Coordinates) -> f64 {
    if ![from.lat, from.lng, to.lat, to.lng]
        .iter()
        .all(|v| v.is_finite())
    {
        return 0.0;
    }

    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Linear interpolation between two points, `t` in `[0, 1]`.
#[must_use]
pub fn interpolate(from: Coordinates, to: Coordinates, t: f64) -> Coordinates {
    Coordinates::new(
        from.lat + (to.lat - from.lat) * t,
        from.lng + (to.lng - from.lng) * t,
    )
}

/// The animation state machine for one resolved checkpoint list.
#[derive(Debug, Clone)]
pub struct RouteAnimator {
    checkpoints: Vec<Checkpoint>,
    config: AnimationConfig,
    state: AnimationState,
    step: u32,
}

impl RouteAnimator {
    /// Starts `Idle` for an empty list, otherwise `Animating` on the derived
    /// current leg.
    #[must_use]
    pub fn new(checkpoints: Vec<Checkpoint>, config: AnimationConfig) -> Self {
        let state = Self::resting_state(&checkpoints);
        Self {
            checkpoints,
            config,
            state,
            step: 0,
        }
    }

    fn resting_state(checkpoints: &[Checkpoint]) -> AnimationState {
        if checkpoints.is_empty() {
            AnimationState::Idle
        } else {
            AnimationState::Animating {
                current_index: current_index(checkpoints),
            }
        }
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    #[must_use]
    pub fn config(&self) -> AnimationConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// `None` while idle.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (!self.checkpoints.is_empty()).then(|| current_index(&self.checkpoints))
    }

    /// Index into [`RouteAnimator::checkpoints`] of the selected checkpoint.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match self.state {
            AnimationState::Selected { checkpoint_id } => self.index_of(checkpoint_id),
            _ => None,
        }
    }

    fn index_of(&self, checkpoint_id: usize) -> Option<usize> {
        self.checkpoints.iter().position(|cp| cp.id == checkpoint_id)
    }

    /// The current leg as `(from, to)` checkpoints; `to` is `None` on the
    /// last checkpoint.
    fn leg(&self) -> Option<(&Checkpoint, Option<&Checkpoint>)> {
        let index = self.current_index()?;
        let from = self.checkpoints.get(index)?;
        Some((from, self.checkpoints.get(index + 1)))
    }

    /// Whether ticks move the marker.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
            && matches!(self.leg(), Some((_, Some(_))))
    }

    /// Freezes on the checkpoint with `checkpoint_id`. Unknown ids are
    /// ignored and return `false`.
    pub fn select(&mut self, checkpoint_id: usize) -> bool {
        if self.index_of(checkpoint_id).is_none() {
            return false;
        }
        self.state = AnimationState::Selected { checkpoint_id };
        true
    }

    /// Returns to animating the current leg from its start.
    pub fn deselect(&mut self) {
        if matches!(self.state, AnimationState::Selected { .. }) {
            self.state = Self::resting_state(&self.checkpoints);
            self.step = 0;
        }
    }

    /// Advances one frame, wrapping back to the leg start after the last
    /// step. No-op unless the marker is moving.
    pub fn tick(&mut self) -> Frame {
        if self.is_moving() {
            self.step = (self.step + 1) % self.config.steps;
        }
        self.frame()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        f64::from(self.step) / f64::from(self.config.steps)
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        let progress = self.progress();
        let leg_bearing = match self.leg() {
            Some((from, Some(to))) => bearing(from.coordinates, to.coordinates),
            _ => 0.0,
        };

        let (position, viewport) = match self.state {
            AnimationState::Idle => (None, None),
            AnimationState::Animating { .. } => match self.leg() {
                Some((from, next)) => {
                    let position = match next {
                        Some(to) => interpolate(from.coordinates, to.coordinates, progress),
                        None => from.coordinates,
                    };
                    let viewport = Viewport {
                        center: from.coordinates.as_pair(),
                        zoom: ANIMATING_ZOOM,
                    };
                    (Some(position), Some(viewport))
                }
                None => (None, None),
            },
            AnimationState::Selected { .. } => {
                match self.selected_index().and_then(|i| self.checkpoints.get(i)) {
                    Some(cp) => {
                        let viewport = Viewport {
                            center: cp.coordinates.as_pair(),
                            zoom: SELECTED_ZOOM,
                        };
                        (Some(cp.coordinates), Some(viewport))
                    }
                    None => (None, None),
                }
            }
        };

        Frame {
            position,
            bearing: leg_bearing,
            progress,
            current_index: self.current_index(),
            selected_index: self.selected_index(),
            state: self.state,
            viewport,
        }
    }
}

#[cfg(test)]
#[path = "animation_test.rs"]
mod tests;
