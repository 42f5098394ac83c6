use geo::Geometry as GeoGeometry;
use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::{Coordinate, Polygon};

/// Extract the reachable-area ring from an isochrone GeoJSON geometry.
///
/// Polygons yield their exterior ring; multipolygons yield the exterior ring
/// of their first member. GeoJSON `[lon, lat]` order is converted to
/// `Coordinate`.
pub fn ring_from_geojson(geometry: geojson::Geometry) -> Result<Polygon> {
    let geo_geometry = GeoGeometry::<f64>::try_from(geometry).map_err(|e| {
        WalkshedError::IsochroneFailure {
            reason: format!("Unreadable isochrone geometry: {}", e),
        }
    })?;

    let exterior = match geo_geometry {
        GeoGeometry::Polygon(polygon) => polygon.exterior().clone(),
        GeoGeometry::MultiPolygon(multi) => match multi.0.into_iter().next() {
            Some(polygon) => polygon.exterior().clone(),
            None => {
                return Err(WalkshedError::IsochroneFailure {
                    reason: "Isochrone multipolygon has no members".to_string(),
                })
            }
        },
        other => {
            return Err(WalkshedError::IsochroneFailure {
                reason: format!("Expected a polygon isochrone, got {}", geometry_name(&other)),
            })
        }
    };

    let ring: Vec<Coordinate> = exterior.coords().map(|c| Coordinate::new(c.y, c.x)).collect();
    if ring.len() < 3 {
        return Err(WalkshedError::IsochroneFailure {
            reason: format!("Isochrone ring has only {} vertices", ring.len()),
        });
    }

    Ok(Polygon::new(ring))
}

fn geometry_name(geometry: &GeoGeometry<f64>) -> &'static str {
    match geometry {
        GeoGeometry::Point(_) => "Point",
        GeoGeometry::LineString(_) => "LineString",
        GeoGeometry::MultiPoint(_) => "MultiPoint",
        GeoGeometry::MultiLineString(_) => "MultiLineString",
        GeoGeometry::GeometryCollection(_) => "GeometryCollection",
        _ => "non-polygon geometry",
    }
}
