use async_trait::async_trait;
use geojson::FeatureCollection;
use reqwest::Url;
use serde_json::Value as JsonValue;
use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::Polygon;
use walkshed_core::ports::{IsochroneProvider, IsochroneRequest};
use walkshed_geo::ring_from_geojson;

use crate::body_to_json;

/// Geoapify Isoline API client
pub struct GeoapifyIsoline {
    /// Endpoint, e.g. "https://api.geoapify.com/v1/isoline"
    base_url: String,

    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeoapifyIsoline {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Share a client (and its connection pool) with other adapters
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Time-based isoline; the range is expressed in seconds
    pub fn build_url(&self, request: &IsochroneRequest) -> Result<Url> {
        let range_secs = request.budget_minutes.checked_mul(60).ok_or_else(|| {
            WalkshedError::ConfigInvalid {
                key: "walk_minutes".to_string(),
                reason: format!("{} minutes overflows the isoline range", request.budget_minutes),
            }
        })?;

        let params = [
            ("lat", request.center.lat.to_string()),
            ("lon", request.center.lon.to_string()),
            ("type", "time".to_string()),
            ("mode", request.mode.as_str().to_string()),
            ("range", range_secs.to_string()),
            ("apiKey", self.api_key.clone()),
        ];

        Url::parse_with_params(&self.base_url, &params).map_err(|e| {
            WalkshedError::ConfigInvalid {
                key: "isoline_url".to_string(),
                reason: format!("{}: {}", self.base_url, e),
            }
        })
    }
}

#[async_trait]
impl IsochroneProvider for GeoapifyIsoline {
    async fn isochrone(&self, request: &IsochroneRequest) -> Result<Polygon> {
        let url = self.build_url(request)?;

        // The URL carries the API key; keep it out of error text
        let response = self.client.get(url).send().await.map_err(|e| {
            WalkshedError::IsochroneFailure {
                reason: format!("Request failed: {}", e.without_url()),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| WalkshedError::IsochroneFailure {
            reason: format!("Failed to read response body: {}", e.without_url()),
        })?;

        if !status.is_success() {
            return Err(WalkshedError::IsochroneFailure {
                reason: format!("Isoline API error ({}): {}", status, text),
            });
        }

        let polygon = parse_isoline(body_to_json(text))?;
        tracing::debug!(vertices = polygon.len(), "Fetched isochrone");
        Ok(polygon)
    }
}

/// Parse an Isoline response body into the reachable-area ring
pub fn parse_isoline(body: JsonValue) -> Result<Polygon> {
    let collection: FeatureCollection =
        serde_json::from_value(body).map_err(|e| WalkshedError::IsochroneFailure {
            reason: format!("Malformed isoline response: {}", e),
        })?;

    let geometry = collection
        .features
        .into_iter()
        .next()
        .and_then(|feature| feature.geometry)
        .ok_or_else(|| WalkshedError::IsochroneFailure {
            reason: "Isoline response has no geometry".to_string(),
        })?;

    ring_from_geojson(geometry)
}
