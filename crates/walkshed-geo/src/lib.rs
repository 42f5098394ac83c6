//! Walkshed Geo - Planar containment, quantization, and coordinate checks
//!
//! This crate handles the geometric side of a lookup: restricting provider
//! results to the reachable area, bucketing coordinates for cache keys, and
//! validating inbound coordinates.

pub mod containment;
pub mod isochrone;
pub mod quantize;
pub mod validation;

pub use containment::{filter_within, point_in_polygon};
pub use isochrone::ring_from_geojson;
pub use quantize::{quantize, round_to};
pub use validation::{ensure_valid, validate_coordinate, ValidationResult};
