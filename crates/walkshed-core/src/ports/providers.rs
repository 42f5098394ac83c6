use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Coordinate, Poi, Polygon};

/// Parameters of a proximity search against the POI provider
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSearch {
    pub center: Coordinate,
    pub radius_meters: u32,
    /// Provider category tags to search for
    pub tags: Vec<String>,
    pub limit: usize,
}

/// Travel mode for isochrone requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Walk,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
        }
    }
}

/// Parameters of an isochrone request
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    pub center: Coordinate,
    pub mode: TravelMode,
    pub budget_minutes: u32,
}

impl IsochroneRequest {
    pub fn walking(center: Coordinate, budget_minutes: u32) -> Self {
        Self {
            center,
            mode: TravelMode::Walk,
            budget_minutes,
        }
    }
}

/// Port for the point-of-interest provider
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Search for points of interest around a center.
    ///
    /// A provider response without a feature list is reported as
    /// `WalkshedError::ProviderExhausted` carrying the raw body.
    async fn search(&self, search: &PoiSearch) -> Result<Vec<Poi>>;
}

/// Port for the isochrone provider
#[async_trait]
pub trait IsochroneProvider: Send + Sync {
    /// Fetch the reachable-area polygon; failures are `WalkshedError::IsochroneFailure`
    async fn isochrone(&self, request: &IsochroneRequest) -> Result<Polygon>;
}

#[async_trait]
impl<T: PoiProvider + ?Sized> PoiProvider for Arc<T> {
    async fn search(&self, search: &PoiSearch) -> Result<Vec<Poi>> {
        (**self).search(search).await
    }
}

#[async_trait]
impl<T: IsochroneProvider + ?Sized> IsochroneProvider for Arc<T> {
    async fn isochrone(&self, request: &IsochroneRequest) -> Result<Polygon> {
        (**self).isochrone(request).await
    }
}
