pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::TrackingClient;
pub use error::CarrierError;
pub use normalize::{normalize_event, normalize_response};
pub use types::{Provider, TrackRequest, TrackResponse, WireEvent};
