//! Request spacing and retry utilities for the geocoding client.
//!
//! Public geocoders publish strict usage policies (Nominatim: at most one
//! request per second per application). [`Throttle`] enforces a fixed minimum
//! interval between calls to one endpoint; [`retry_with_backoff`] retries
//! transient failures with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::GeocodeError;

/// Enforces a fixed minimum interval between successive calls.
///
/// The lock is held while sleeping, so concurrent callers queue up and are
/// released one interval apart.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until at least `min_interval` has elapsed since the previous
    /// caller was released, then records the current instant.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** 429 responses, timeouts and connection failures, 5xx statuses.
///
/// **Not retriable:** malformed bodies, invalid coordinates, 4xx statuses,
/// bad base URLs. Retrying would return the same result.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::RateLimited { .. } => true,
        GeocodeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeocodeError::UnexpectedStatus { status, .. } => *status >= 500,
        GeocodeError::Deserialize { .. }
        | GeocodeError::InvalidCoordinates { .. }
        | GeocodeError::InvalidBaseUrl { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Delay before the next attempt. A 429 waits at least the server's
/// `Retry-After`, whatever the backoff schedule says. Capped at 30 s.
pub(crate) fn retry_delay(err: &GeocodeError, backoff_ms: u64) -> Duration {
    let floor_ms = match err {
        GeocodeError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    Duration::from_millis(backoff_ms.max(floor_ms).min(MAX_DELAY_MS))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt      |
/// |---------|--------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 500 ms × 2¹ ± 25 % jitter     |
///
/// A rate-limited attempt sleeps for at least the server's `Retry-After`.
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GeocodeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeocodeError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay = retry_delay(&err, jittered);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(MAX_DELAY_MS),
                    error = %err,
                    "geocoder transient error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
