//! In-memory memoization of successful geocode lookups.

use std::collections::HashMap;

use tokio::sync::Mutex;
use waybill_core::Coordinates;

use crate::lookup::GeocodeLookup;

/// Wraps a [`GeocodeLookup`] and remembers successful results by query.
///
/// Misses are not cached, so a transient failure does not pin a location as
/// unresolvable. Cached hits skip the inner geocoder entirely, including its
/// request throttle.
pub struct CachedGeocoder<G> {
    inner: G,
    hits: Mutex<HashMap<String, Coordinates>>,
}

impl<G> CachedGeocoder<G> {
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.hits.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hits.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.hits.lock().await.clear();
    }
}

impl<G: GeocodeLookup> GeocodeLookup for CachedGeocoder<G> {
    async fn lookup(&self, query: &str) -> Option<Coordinates> {
        if let Some(coords) = self.hits.lock().await.get(query).copied() {
            tracing::debug!(query, "geocode cache hit");
            return Some(coords);
        }

        let resolved = self.inner.lookup(query).await?;
        self.hits.lock().await.insert(query.to_owned(), resolved);
        Some(resolved)
    }
}
