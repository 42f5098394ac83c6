use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 position treated as a planar (longitude, latitude) point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `[lat, lon]` as carried in response envelopes
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self { lat: pair[0], lon: pair[1] }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A coordinate rounded to a fixed number of decimals.
///
/// Only used as a cache key and durable-store lookup key, never returned to
/// callers. Build it through `walkshed_geo::quantize` so every caller rounds
/// the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizedCoordinate {
    lat: f64,
    lon: f64,
    decimals: u32,
}

impl QuantizedCoordinate {
    /// Wrap values that have already been rounded to `decimals` places
    pub fn from_rounded(lat: f64, lon: f64, decimals: u32) -> Self {
        Self { lat, lon, decimals }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Key used in the fast tier, e.g. `"40.000:-75.000"`
    pub fn cache_key(&self) -> String {
        let precision = self.decimals as usize;
        format!("{:.*}:{:.*}", precision, self.lat, precision, self.lon)
    }
}

impl fmt::Display for QuantizedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// Boundary of a walking-reachable region.
///
/// The ring may be open or closed; containment closes it implicitly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub ring: Vec<Coordinate>,
}

impl Polygon {
    pub fn new(ring: Vec<Coordinate>) -> Self {
        Self { ring }
    }

    /// Build from `(lat, lon)` tuples
    pub fn from_lat_lon(points: &[(f64, f64)]) -> Self {
        Self { ring: points.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)).collect() }
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Whether the first and last vertex coincide
    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => self.ring.len() > 1 && first == last,
            _ => false,
        }
    }
}
