//! Geocoder and resolver construction from [`AppConfig`].

use std::sync::Arc;

use anyhow::Context;
use waybill_core::{AppConfig, Coordinates};
use waybill_geocode::{CachedGeocoder, GeocodeLookup, GeocoderSettings, NominatimClient};
use waybill_tracker::{CheckpointResolver, LocationTables, SamplingPolicy};

/// Nominatim client, optionally behind the in-memory cache.
pub(crate) enum Geocoder {
    Direct(NominatimClient),
    Cached(CachedGeocoder<NominatimClient>),
}

impl GeocodeLookup for Geocoder {
    async fn lookup(&self, query: &str) -> Option<Coordinates> {
        match self {
            Geocoder::Direct(client) => client.lookup(query).await,
            Geocoder::Cached(cached) => cached.lookup(query).await,
        }
    }
}

/// Built-in tables, with sections replaced from `WAYBILL_LOCATIONS_PATH` when set.
pub(crate) fn location_tables(config: &AppConfig) -> anyhow::Result<Arc<LocationTables>> {
    let tables = match &config.locations_path {
        Some(path) => LocationTables::load(path)?,
        None => LocationTables::builtin().clone(),
    };
    Ok(Arc::new(tables))
}

pub(crate) fn build_resolver(config: &AppConfig) -> anyhow::Result<CheckpointResolver<Geocoder>> {
    let client = NominatimClient::new(&GeocoderSettings::from_app_config(config))
        .context("failed to build geocoder client")?;
    let geocoder = if config.geocode_cache {
        Geocoder::Cached(CachedGeocoder::new(client))
    } else {
        Geocoder::Direct(client)
    };

    Ok(CheckpointResolver::new(geocoder)
        .with_sampling(SamplingPolicy::from_app_config(config)?)
        .with_tables(location_tables(config)?))
}
