//! Ring repair: zero-length edge removal and closure.

use ixstats_sanitize_models::{LngLat, SanitizationStats};

use crate::geometry::{Polygon, Ring, Shape};

/// Minimum number of distinct vertices a ring needs before it is closed.
const MIN_CLOSABLE_POINTS: usize = 3;

/// Removes consecutive duplicates and closes the ring.
///
/// A point within `epsilon` of the last kept point is dropped. If at least
/// three points remain and the first and last differ, a copy of the first
/// is appended; if they are within `epsilon` but not identical, the last
/// point is replaced by an exact copy of the first. Shorter rings are
/// returned deduplicated but unclosed. Applying this twice is a no-op.
#[must_use]
pub fn repair_ring(ring: &Ring, epsilon: f64) -> (Ring, SanitizationStats) {
    let mut stats = SanitizationStats::default();
    let mut points: Vec<LngLat> = Vec::with_capacity(ring.len() + 1);

    for point in &ring.0 {
        if points
            .last()
            .is_some_and(|last| last.approx_eq(point, epsilon))
        {
            stats.duplicates_removed += 1;
        } else {
            points.push(*point);
        }
    }

    if points.len() >= MIN_CLOSABLE_POINTS {
        let first = points[0];
        let last = points[points.len() - 1];
        if !first.approx_eq(&last, epsilon) {
            points.push(first);
            stats.rings_closed += 1;
        } else if first != last {
            let end = points.len() - 1;
            points[end] = first;
            stats.rings_closed += 1;
        }
    }

    (Ring(points), stats)
}

/// Repairs every ring of a polygon.
#[must_use]
pub fn repair_polygon(polygon: &Polygon, epsilon: f64) -> (Polygon, SanitizationStats) {
    let mut stats = SanitizationStats::default();
    let rings = polygon
        .0
        .iter()
        .map(|ring| {
            let (ring, ring_stats) = repair_ring(ring, epsilon);
            stats += ring_stats;
            ring
        })
        .collect();
    (Polygon(rings), stats)
}

/// Repairs every ring in a geometry. Non-polygonal members pass through.
#[must_use]
pub fn repair_shape(shape: &Shape, epsilon: f64) -> (Shape, SanitizationStats) {
    match shape {
        Shape::Polygon(polygon) => {
            let (polygon, stats) = repair_polygon(polygon, epsilon);
            (Shape::Polygon(polygon), stats)
        }
        Shape::MultiPolygon(polygons) => {
            let mut stats = SanitizationStats::default();
            let polygons = polygons
                .iter()
                .map(|polygon| {
                    let (polygon, polygon_stats) = repair_polygon(polygon, epsilon);
                    stats += polygon_stats;
                    polygon
                })
                .collect();
            (Shape::MultiPolygon(polygons), stats)
        }
        Shape::GeometryCollection(shapes) => {
            let mut stats = SanitizationStats::default();
            let shapes = shapes
                .iter()
                .map(|shape| {
                    let (shape, shape_stats) = repair_shape(shape, epsilon);
                    stats += shape_stats;
                    shape
                })
                .collect();
            (Shape::GeometryCollection(shapes), stats)
        }
        Shape::Point(_) | Shape::MultiPoint(_) | Shape::LineString(_) | Shape::MultiLineString(_) => {
            (shape.clone(), SanitizationStats::default())
        }
    }
}
