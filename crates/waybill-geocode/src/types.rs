//! Nominatim `/search` response types.
//!
//! Nominatim returns a JSON array of places with `lat`/`lon` encoded as
//! decimal strings.

use serde::Deserialize;

/// One result from Nominatim's `/search?format=json` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
}
