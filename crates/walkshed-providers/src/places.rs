use async_trait::async_trait;
use geojson::{Feature, FeatureCollection};
use reqwest::Url;
use serde_json::Value as JsonValue;
use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::{Coordinate, Poi};
use walkshed_core::ports::{PoiProvider, PoiSearch};

use crate::body_to_json;

const PROVIDER: &str = "geoapify-places";

/// Geoapify Places API client
pub struct GeoapifyPlaces {
    /// Endpoint, e.g. "https://api.geoapify.com/v2/places"
    base_url: String,

    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeoapifyPlaces {
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

    /// Circle filter around the center, results biased toward proximity
    pub fn build_url(&self, search: &PoiSearch) -> Result<Url> {
        let center = search.center;
        let params = [
            ("categories", search.tags.join(",")),
            ("filter", format!("circle:{},{},{}", center.lon, center.lat, search.radius_meters)),
            ("bias", format!("proximity:{},{}", center.lon, center.lat)),
            ("limit", search.limit.to_string()),
            ("apiKey", self.api_key.clone()),
        ];

        Url::parse_with_params(&self.base_url, &params).map_err(|e| {
            WalkshedError::ConfigInvalid {
                key: "places_url".to_string(),
                reason: format!("{}: {}", self.base_url, e),
            }
        })
    }
}

#[async_trait]
impl PoiProvider for GeoapifyPlaces {
    async fn search(&self, search: &PoiSearch) -> Result<Vec<Poi>> {
        let url = self.build_url(search)?;

        // The URL carries the API key; keep it out of error text
        let response = self.client.get(url).send().await.map_err(|e| WalkshedError::Upstream {
            provider: PROVIDER.to_string(),
            reason: format!("Request failed: {}", e.without_url()),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| WalkshedError::Upstream {
            provider: PROVIDER.to_string(),
            reason: format!("Failed to read response body: {}", e.without_url()),
        })?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Places provider returned an error status");
        }

        let pois = parse_places(body_to_json(text))?;
        tracing::debug!(count = pois.len(), lat = search.center.lat, lon = search.center.lon, "Fetched places");
        Ok(pois)
    }
}

/// Parse a Places response body.
///
/// A body without a `features` array is the provider's way of saying its
/// quota is spent; it is returned verbatim as `ProviderExhausted`.
pub fn parse_places(body: JsonValue) -> Result<Vec<Poi>> {
    if !body.get("features").map(JsonValue::is_array).unwrap_or(false) {
        return Err(WalkshedError::ProviderExhausted { response: body });
    }

    let collection: FeatureCollection =
        serde_json::from_value(body).map_err(|e| WalkshedError::Upstream {
            provider: PROVIDER.to_string(),
            reason: format!("Malformed feature collection: {}", e),
        })?;

    let mut pois = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        match poi_from_feature(feature) {
            Some(poi) => pois.push(poi),
            None => tracing::warn!("Skipping place without coordinates"),
        }
    }

    Ok(pois)
}

fn poi_from_feature(feature: &Feature) -> Option<Poi> {
    let properties = feature.properties.as_ref();
    let prop = |key: &str| properties.and_then(|p| p.get(key));
    let prop_str = |key: &str| prop(key).and_then(JsonValue::as_str).map(str::to_string);

    let coordinate = match (prop("lat").and_then(JsonValue::as_f64), prop("lon").and_then(JsonValue::as_f64)) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => point_coordinate(feature)?,
    };

    let tags: Vec<String> = prop("categories")
        .and_then(JsonValue::as_array)
        .map(|values| values.iter().filter_map(JsonValue::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let id = prop_str("place_id")
        .unwrap_or_else(|| format!("{},{}", coordinate.lat, coordinate.lon));

    let mut poi = Poi::new(id, coordinate, tags);
    poi.name = prop_str("name");
    poi.address = prop_str("formatted");
    Some(poi)
}

fn point_coordinate(feature: &Feature) -> Option<Coordinate> {
    match &feature.geometry.as_ref()?.value {
        geojson::Value::Point(position) if position.len() >= 2 => {
            Some(Coordinate::new(position[1], position[0]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search() -> PoiSearch {
        PoiSearch {
            center: Coordinate::new(40.0, -75.0),
            radius_meters: 5000,
            tags: vec!["commercial.supermarket".to_string(), "catering.fast_food".to_string()],
            limit: 100,
        }
    }

    #[test]
    fn test_build_url() {
        let places = GeoapifyPlaces::new("https://api.geoapify.com/v2/places", "KEY");
        let url = places.build_url(&search()).unwrap();
        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();

        assert!(pairs.contains(&(
            "categories".to_string(),
            "commercial.supermarket,catering.fast_food".to_string()
        )));
        assert!(pairs.contains(&("filter".to_string(), "circle:-75,40,5000".to_string())));
        assert!(pairs.contains(&("bias".to_string(), "proximity:-75,40".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "100".to_string())));
        assert!(pairs.contains(&("apiKey".to_string(), "KEY".to_string())));
    }

    #[test]
    fn test_build_url_rejects_bad_base() {
        let places = GeoapifyPlaces::new("not a url", "KEY");
        assert!(places.build_url(&search()).is_err());
    }

    #[tokio::test]
    async fn test_transport_error_omits_api_key() {
        let places = GeoapifyPlaces::new("http://127.0.0.1:1/v2/places", "SUPERSECRETKEY");

        match places.search(&search()).await {
            Err(WalkshedError::Upstream { provider, reason }) => {
                assert_eq!(provider, PROVIDER);
                assert!(!reason.contains("SUPERSECRETKEY"), "{reason}");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_places() {
        let body = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "name": "Corner Market",
                        "formatted": "1 Main St",
                        "lat": 40.001,
                        "lon": -75.002,
                        "categories": ["commercial", "commercial.supermarket"],
                        "place_id": "abc123"
                    },
                    "geometry": { "type": "Point", "coordinates": [-75.002, 40.001] }
                },
                {
                    "type": "Feature",
                    "properties": { "categories": ["catering.fast_food"] },
                    "geometry": { "type": "Point", "coordinates": [-75.01, 40.02] }
                }
            ]
        });

        let pois = parse_places(body).unwrap();
        assert_eq!(pois.len(), 2);

        assert_eq!(pois[0].id, "abc123");
        assert_eq!(pois[0].name.as_deref(), Some("Corner Market"));
        assert_eq!(pois[0].address.as_deref(), Some("1 Main St"));
        assert_eq!(pois[0].coordinate, Coordinate::new(40.001, -75.002));
        assert!(pois[0].has_tag("commercial.supermarket"));
        assert!(pois[0].categories.is_empty());

        // Falls back to the point geometry
        assert_eq!(pois[1].coordinate, Coordinate::new(40.02, -75.01));
        assert!(pois[1].name.is_none());
    }

    #[test]
    fn test_missing_features_is_exhaustion() {
        let body = json!({
            "statusCode": 429,
            "error": "Too Many Requests",
            "message": "You exceeded the daily credits"
        });

        match parse_places(body.clone()) {
            Err(WalkshedError::ProviderExhausted { response }) => assert_eq!(response, body),
            other => panic!("expected ProviderExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_kept_verbatim() {
        let body = body_to_json("Service Unavailable".to_string());
        match parse_places(body) {
            Err(WalkshedError::ProviderExhausted { response }) => {
                assert_eq!(response, json!("Service Unavailable"));
            }
            other => panic!("expected ProviderExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_feature_list_is_not_exhaustion() {
        let body = json!({ "type": "FeatureCollection", "features": [] });
        assert!(parse_places(body).unwrap().is_empty());
    }
}
