use walkshed_core::models::{Coordinate, Poi, Polygon};

/// Even-odd ray-casting point-in-polygon test on planar (lon, lat).
///
/// A horizontal ray is cast from the point towards +x and crossings with each
/// edge are counted; the last vertex is joined back to the first, so open and
/// closed rings behave the same. Points exactly on an edge may land either way.
pub fn point_in_polygon(point: &Coordinate, polygon: &Polygon) -> bool {
    let ring = &polygon.ring;
    if ring.len() < 3 {
        return false;
    }

    let (x, y) = (point.lon, point.lat);
    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);

        // Edge straddles the ray's y; horizontal edges never do
        if (yi > y) != (yj > y) {
            let x_cross = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Keep the points of interest whose coordinate lies inside the polygon
pub fn filter_within(pois: Vec<Poi>, polygon: &Polygon) -> Vec<Poi> {
    pois.into_iter().filter(|poi| point_in_polygon(&poi.coordinate, polygon)).collect()
}
