//! Lookup generations and the stale-result guard.
//!
//! Each generation owns a [`CancellationToken`]. Advancing cancels the
//! previous token, so work parked on an in-flight geocoder call returns as
//! soon as a newer lookup starts.

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    token: CancellationToken,
}

/// Monotonic counter bumped on every new shipment lookup.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<Mutex<Current>>,
}

impl Generation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation and returns a guard bound to it. Every guard
    /// handed out earlier is cancelled.
    #[must_use]
    pub fn advance(&self) -> StaleGuard {
        let mut current = self.lock();
        current.token.cancel();
        current.generation += 1;
        current.token = CancellationToken::new();
        StaleGuard {
            token: current.token.clone(),
            generation: current.generation,
        }
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.lock().generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tells in-flight work whether its lookup has been superseded.
#[derive(Debug, Clone)]
pub struct StaleGuard {
    token: CancellationToken,
    generation: u64,
}

impl StaleGuard {
    /// A guard that never goes stale, for one-off pipeline runs.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            token: CancellationToken::new(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled()
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once a newer generation has started.
    pub async fn superseded(&self) {
        self.token.cancelled().await;
    }
}
