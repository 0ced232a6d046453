//! The geocoding collaborator contract consumed by the checkpoint resolver.

use std::future::Future;
use std::sync::Arc;

use waybill_core::Coordinates;

use crate::client::NominatimClient;

/// Resolves a free-text location query to a single best-match coordinate.
///
/// Implementations must absorb their own failures: HTTP errors, empty result
/// sets, and malformed payloads all surface as `None`.
pub trait GeocodeLookup: Send + Sync {
    fn lookup(&self, query: &str) -> impl Future<Output = Option<Coordinates>> + Send;
}

impl GeocodeLookup for NominatimClient {
    async fn lookup(&self, query: &str) -> Option<Coordinates> {
        match self.search(query).await {
            Ok(Some(coords)) => {
                tracing::debug!(query, lat = coords.lat, lng = coords.lng, "geocoded");
                Some(coords)
            }
            Ok(None) => {
                tracing::warn!(query, "no geocoding results");
                None
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "geocoding failed");
                None
            }
        }
    }
}

impl<G: GeocodeLookup> GeocodeLookup for Arc<G> {
    fn lookup(&self, query: &str) -> impl Future<Output = Option<Coordinates>> + Send {
        self.as_ref().lookup(query)
    }
}

impl<G: GeocodeLookup> GeocodeLookup for &G {
    fn lookup(&self, query: &str) -> impl Future<Output = Option<Coordinates>> + Send {
        (**self).lookup(query)
    }
}
