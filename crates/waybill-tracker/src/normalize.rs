//! Free-text carrier location → geocoder query.
//!
//! Carrier scans look like `"HYDERABAD TELANGANA [IN]"` or `"MEMPHIS, TN"`.
//! Curated city overrides are checked before the bracketed country code is
//! expanded, because region names in these strings disambiguate better than
//! the code alone.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::locations::LocationTables;

static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Z]{2})\]").expect("valid country code regex"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid bracket regex"));

/// Which rule produced a normalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Nothing usable was left after cleaning.
    Empty,
    /// A curated Indian or US city/region override matched.
    CityOverride,
    /// A bracketed country code was expanded to a country name.
    CountryCode,
    /// The text already names a known country.
    KnownCountry,
    /// No rule applied; the cleaned text is used as-is.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedLocation {
    pub query: String,
    pub rule: MatchRule,
}

/// Normalizes `raw` against the built-in tables. See [`normalize_location_with`].
#[must_use]
pub fn normalize_location(raw: &str) -> String {
    normalize_location_with(raw, LocationTables::builtin())
}

/// Turns a raw carrier location into a query string for the geocoder.
///
/// Returns an empty string when nothing usable is left after cleaning.
#[must_use]
pub fn normalize_location_with(raw: &str, tables: &LocationTables) -> String {
    classify_location(raw, tables).query
}

/// Like [`normalize_location_with`] but also reports which rule fired.
#[must_use]
pub fn classify_location(raw: &str, tables: &LocationTables) -> NormalizedLocation {
    let done = |query: String, rule: MatchRule| NormalizedLocation { query, rule };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return done(String::new(), MatchRule::Empty);
    }

    let country_code = COUNTRY_CODE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    let cleaned = BRACKETED.replace_all(trimmed, "");
    let cleaned = cleaned.trim();
    let upper = cleaned.to_uppercase();

    let city_match = tables
        .indian_cities
        .iter()
        .chain(&tables.us_cities)
        .find(|entry| upper.contains(entry.pattern.as_str()));
    if let Some(entry) = city_match {
        return done(entry.query.clone(), MatchRule::CityOverride);
    }

    if let Some(country) = country_code.and_then(|code| tables.country_name(code)) {
        let query = if cleaned.is_empty() {
            country.to_owned()
        } else {
            format!("{cleaned}, {country}")
        };
        return done(query, MatchRule::CountryCode);
    }

    if cleaned.is_empty() {
        return done(String::new(), MatchRule::Empty);
    }

    if tables
        .known_countries
        .iter()
        .any(|country| upper.contains(country.as_str()))
    {
        return done(cleaned.to_owned(), MatchRule::KnownCountry);
    }

    done(cleaned.to_owned(), MatchRule::Passthrough)
}
