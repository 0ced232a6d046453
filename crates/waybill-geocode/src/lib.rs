pub mod cache;
pub mod client;
pub mod error;
pub mod lookup;
pub mod rate_limit;
pub mod types;

pub use cache::CachedGeocoder;
pub use client::{GeocoderSettings, NominatimClient};
pub use error::GeocodeError;
pub use lookup::GeocodeLookup;
pub use rate_limit::Throttle;
pub use types::NominatimPlace;
