//! Walkshed Providers - Upstream place and isochrone adapters
//!
//! This crate adapts the Geoapify Places and Isoline APIs behind the
//! `PoiProvider` and `IsochroneProvider` ports.

pub mod isoline;
pub mod places;

pub use isoline::{parse_isoline, GeoapifyIsoline};
pub use places::{parse_places, GeoapifyPlaces};

/// Read a response body as JSON, keeping non-JSON bodies as a string value
pub(crate) fn body_to_json(text: String) -> serde_json::Value {
    serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}
