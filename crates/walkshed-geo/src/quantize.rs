use walkshed_core::models::{Coordinate, QuantizedCoordinate};

/// Round a value to `decimals` places, half away from zero.
///
/// `-0.0` is folded into `0.0` so both render to the same cache key.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale + 0.0
}

/// Snap a precise coordinate onto the cache grid.
///
/// With 3 decimals a grid cell is roughly 100 m across; every coordinate in a
/// cell shares one cache entry.
pub fn quantize(coordinate: &Coordinate, decimals: u32) -> QuantizedCoordinate {
    QuantizedCoordinate::from_rounded(
        round_to(coordinate.lat, decimals),
        round_to(coordinate.lon, decimals),
        decimals,
    )
}
