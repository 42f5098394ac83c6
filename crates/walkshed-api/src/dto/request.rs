use serde::Deserialize;

/// Query string of `GET /api/v1/pois`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PoiQuery {
    pub lat: f64,
    pub lon: f64,
}
