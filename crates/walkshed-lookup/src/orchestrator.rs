use walkshed_core::config::LayeredConfig;
use walkshed_core::error::Result;
use walkshed_core::models::{CategorizedResult, Coordinate};
use walkshed_core::ports::{IsochroneProvider, IsochroneRequest, PoiProvider, PoiSearch};
use walkshed_geo::filter_within;

use crate::classify::Classifier;

/// Fixed parameters of the upstream calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSettings {
    pub radius_meters: u32,
    pub limit: usize,
    pub walk_minutes: u32,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            radius_meters: 5_000,
            limit: 100,
            walk_minutes: 30,
        }
    }
}

impl LookupSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            radius_meters: config.poi_radius_meters.value,
            limit: config.poi_limit.value,
            walk_minutes: config.walk_minutes.value,
        }
    }
}

/// Lookup pipeline: places, isochrone, containment filter, classification
pub struct LookupOrchestrator<P, I>
where
    P: PoiProvider,
    I: IsochroneProvider,
{
    poi_provider: P,
    isochrone_provider: I,
    classifier: Classifier,
    settings: LookupSettings,
}

impl<P, I> LookupOrchestrator<P, I>
where
    P: PoiProvider,
    I: IsochroneProvider,
{
    pub fn new(poi_provider: P, isochrone_provider: I, settings: LookupSettings) -> Self {
        Self {
            poi_provider,
            isochrone_provider,
            classifier: Classifier::default(),
            settings,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    /// Run the full pipeline for one coordinate.
    ///
    /// Either every step succeeds or the first error is returned; no partial
    /// results and no retries.
    pub async fn lookup(&self, center: Coordinate) -> Result<CategorizedResult> {
        // Phase 1: candidate places around the center
        let search = PoiSearch {
            center,
            radius_meters: self.settings.radius_meters,
            tags: self.classifier.tags(),
            limit: self.settings.limit,
        };
        let candidates = self.poi_provider.search(&search).await?;

        // Phase 2: reachable area
        let request = IsochroneRequest::walking(center, self.settings.walk_minutes);
        let isochrone = self.isochrone_provider.isochrone(&request).await?;

        // Phase 3: keep what is actually walkable
        let candidate_count = candidates.len();
        let reachable = filter_within(candidates, &isochrone);

        // Phase 4: bucket
        let result = self.classifier.categorize(reachable);

        tracing::info!(
            lat = center.lat,
            lon = center.lon,
            candidates = candidate_count,
            classified = result.total(),
            isochrone_vertices = isochrone.len(),
            "Lookup completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use walkshed_core::error::WalkshedError;
    use walkshed_core::models::{Poi, Polygon};

    struct StubPlaces {
        pois: Vec<Poi>,
        seen: Mutex<Option<PoiSearch>>,
    }

    #[async_trait]
    impl PoiProvider for StubPlaces {
        async fn search(&self, search: &PoiSearch) -> Result<Vec<Poi>> {
            *self.seen.lock().unwrap() = Some(search.clone());
            Ok(self.pois.clone())
        }
    }

    struct ExhaustedPlaces;

    #[async_trait]
    impl PoiProvider for ExhaustedPlaces {
        async fn search(&self, _search: &PoiSearch) -> Result<Vec<Poi>> {
            Err(WalkshedError::ProviderExhausted {
                response: serde_json::json!({ "message": "credits exhausted" }),
            })
        }
    }

    struct StubIsochrone {
        polygon: Option<Polygon>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IsochroneProvider for StubIsochrone {
        async fn isochrone(&self, request: &IsochroneRequest) -> Result<Polygon> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.budget_minutes, 30);
            self.polygon.clone().ok_or_else(|| WalkshedError::IsochroneFailure {
                reason: "routing engine unavailable".to_string(),
            })
        }
    }

    fn square_around(center: Coordinate, half: f64) -> Polygon {
        Polygon::from_lat_lon(&[
            (center.lat - half, center.lon - half),
            (center.lat - half, center.lon + half),
            (center.lat + half, center.lon + half),
            (center.lat + half, center.lon - half),
        ])
    }

    fn place(id: &str, lat: f64, lon: f64, tag: &str) -> Poi {
        Poi::new(id, Coordinate::new(lat, lon), vec![tag.to_string()])
    }

    fn isochrone(polygon: Option<Polygon>) -> StubIsochrone {
        StubIsochrone { polygon, calls: AtomicUsize::new(0) }
    }

    #[tokio::test]
    async fn test_filters_and_classifies() {
        let center = Coordinate::new(40.0, -75.0);
        let places = StubPlaces {
            pois: vec![
                place("near-market", 40.001, -75.001, "commercial.supermarket"),
                place("near-pharmacy", 39.999, -75.002, "healthcare.pharmacy"),
                place("far-hotel", 40.2, -75.0, "accommodation.hotel"),
                place("park", 40.0, -75.0, "leisure.park"),
            ],
            seen: Mutex::new(None),
        };
        let orchestrator = LookupOrchestrator::new(
            places,
            isochrone(Some(square_around(center, 0.01))),
            LookupSettings::default(),
        );

        let result = orchestrator.lookup(center).await.unwrap();

        assert_eq!(result.supermarket.len(), 1);
        assert_eq!(result.pharmacy.len(), 1);
        assert!(result.hotel.is_empty());
        assert_eq!(result.total(), 2);

        let search = orchestrator.poi_provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(search.radius_meters, 5_000);
        assert_eq!(search.limit, 100);
        assert_eq!(search.center, center);
        assert_eq!(search.tags.len(), 5);
    }

    #[tokio::test]
    async fn test_exhaustion_stops_pipeline() {
        let orchestrator = LookupOrchestrator::new(
            ExhaustedPlaces,
            isochrone(Some(Polygon::default())),
            LookupSettings::default(),
        );

        let err = orchestrator.lookup(Coordinate::new(40.0, -75.0)).await.unwrap_err();

        assert!(matches!(err, WalkshedError::ProviderExhausted { .. }));
        assert_eq!(orchestrator.isochrone_provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_isochrone_failure_is_fatal() {
        let places = StubPlaces {
            pois: vec![place("m", 40.0, -75.0, "commercial.supermarket")],
            seen: Mutex::new(None),
        };
        let orchestrator =
            LookupOrchestrator::new(places, isochrone(None), LookupSettings::default());

        let err = orchestrator.lookup(Coordinate::new(40.0, -75.0)).await.unwrap_err();

        assert!(matches!(err, WalkshedError::IsochroneFailure { .. }));
        assert_eq!(orchestrator.isochrone_provider.calls.load(Ordering::SeqCst), 1);
    }
}
