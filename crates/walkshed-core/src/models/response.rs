use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategorizedResult, Coordinate, QuantizedCoordinate};

/// Inbound lookup as handed over by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    /// Precise coordinate as supplied by the caller
    pub coordinate: Coordinate,

    /// Caller identity used for quota accounting
    pub requested_by: String,
}

impl LookupRequest {
    pub fn new(lat: f64, lon: f64, requested_by: impl Into<String>) -> Self {
        Self {
            coordinate: Coordinate::new(lat, lon),
            requested_by: requested_by.into(),
        }
    }
}

/// Response envelope returned to callers and stored in both cache tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(rename = "forCoordinates")]
    pub for_coordinates: [f64; 2],

    #[serde(rename = "requestedBy")]
    pub requested_by: String,

    #[serde(rename = "POIbyCategory")]
    pub poi_by_category: CategorizedResult,
}

impl LookupResponse {
    pub fn new(request: &LookupRequest, poi_by_category: CategorizedResult) -> Self {
        Self {
            for_coordinates: request.coordinate.as_pair(),
            requested_by: request.requested_by.clone(),
            poi_by_category,
        }
    }

    /// Same categorized result, addressed to another request
    pub fn readdressed(&self, request: &LookupRequest) -> Self {
        Self::new(request, self.poi_by_category.clone())
    }
}

/// Durable-tier document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurableEntry {
    pub key: QuantizedCoordinate,
    pub response: LookupResponse,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DurableEntry {
    pub fn new(
        key: QuantizedCoordinate,
        response: LookupResponse,
        created_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            key,
            response,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
