//! Curated location lookup tables used by [`crate::normalize`].
//!
//! The tables are data, not logic: the built-in defaults can be replaced
//! section by section from a YAML document without touching code.
//!
//! ```yaml
//! indian_cities:
//!   - { pattern: TELANGANA, query: "Hyderabad, India" }
//! us_cities:
//!   - { pattern: EL PASO, query: "El Paso, Texas, United States" }
//! country_codes:
//!   - { code: IN, name: India }
//! known_countries: [INDIA, GERMANY]
//! ```

use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::TrackerError;

/// Upper-case substring → canonical geocoder query. First match wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityOverride {
    pub pattern: String,
    pub query: String,
}

/// Two-letter bracketed code → country name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryCode {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationTables {
    #[serde(default = "default_indian_cities")]
    pub indian_cities: Vec<CityOverride>,
    #[serde(default = "default_us_cities")]
    pub us_cities: Vec<CityOverride>,
    #[serde(default = "default_country_codes")]
    pub country_codes: Vec<CountryCode>,
    #[serde(default = "default_known_countries")]
    pub known_countries: Vec<String>,
}

impl Default for LocationTables {
    fn default() -> Self {
        Self {
            indian_cities: default_indian_cities(),
            us_cities: default_us_cities(),
            country_codes: default_country_codes(),
            known_countries: default_known_countries(),
        }
    }
}

static BUILTIN: LazyLock<LocationTables> = LazyLock::new(LocationTables::default);

impl LocationTables {
    /// Shared instance of the built-in tables.
    #[must_use]
    pub fn builtin() -> &'static LocationTables {
        &BUILTIN
    }

    /// Parses a YAML document; sections it omits keep their built-in values.
    ///
    /// Patterns and known country names are upper-cased so matching stays
    /// case-insensitive whatever the file contains.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::LocationTablesParse`] if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TrackerError> {
        let tables: LocationTables =
            serde_yaml::from_str(yaml).map_err(|source| TrackerError::LocationTablesParse {
                path: None,
                source,
            })?;
        Ok(tables.canonicalized())
    }

    /// Reads and parses a YAML tables file.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::LocationTablesRead`] if the file cannot be read.
    /// - [`TrackerError::LocationTablesParse`] if the YAML is malformed.
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            TrackerError::LocationTablesRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            TrackerError::LocationTablesParse { source, .. } => TrackerError::LocationTablesParse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }

    /// Looks up the country name for a bracketed code such as `IN`.
    #[must_use]
    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.country_codes
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .map(|c| c.name.as_str())
    }

    fn canonicalized(mut self) -> Self {
        for entry in self.indian_cities.iter_mut().chain(self.us_cities.iter_mut()) {
            entry.pattern = entry.pattern.trim().to_uppercase();
        }
        for country in &mut self.known_countries {
            *country = country.trim().to_uppercase();
        }
        self
    }
}

fn city(pattern: &str, query: &str) -> CityOverride {
    CityOverride {
        pattern: pattern.to_owned(),
        query: query.to_owned(),
    }
}

fn default_indian_cities() -> Vec<CityOverride> {
    vec![
        city("TELANGANA", "Hyderabad, India"),
        city("HYDERABAD", "Hyderabad, India"),
        city("MUMBAI", "Mumbai, India"),
        city("DELHI", "Delhi, India"),
        city("BANGALORE", "Bangalore, India"),
        city("CHENNAI", "Chennai, India"),
        city("KOLKATA", "Kolkata, India"),
    ]
}

fn default_us_cities() -> Vec<CityOverride> {
    vec![
        city("EL PASO", "El Paso, Texas, United States"),
        city("NEW YORK", "New York, United States"),
        city("LOS ANGELES", "Los Angeles, United States"),
        city("CHICAGO", "Chicago, United States"),
        city("HOUSTON", "Houston, United States"),
    ]
}

fn default_country_codes() -> Vec<CountryCode> {
    [
        ("IE", "Ireland"),
        ("DE", "Germany"),
        ("GB", "United Kingdom"),
        ("UK", "United Kingdom"),
        ("US", "United States"),
        ("IN", "India"),
        ("FR", "France"),
        ("IT", "Italy"),
        ("ES", "Spain"),
        ("NL", "Netherlands"),
        ("BE", "Belgium"),
        ("CH", "Switzerland"),
        ("AT", "Austria"),
        ("CN", "China"),
        ("JP", "Japan"),
        ("AE", "United Arab Emirates"),
        ("SA", "Saudi Arabia"),
        ("SG", "Singapore"),
        ("MY", "Malaysia"),
        ("TH", "Thailand"),
    ]
    .into_iter()
    .map(|(code, name)| CountryCode {
        code: code.to_owned(),
        name: name.to_owned(),
    })
    .collect()
}

fn default_known_countries() -> Vec<String> {
    [
        "GERMANY",
        "FRANCE",
        "ITALY",
        "SPAIN",
        "INDIA",
        "CHINA",
        "UNITED STATES",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
