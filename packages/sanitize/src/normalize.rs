//! Per-coordinate normalization.
//!
//! Longitudes within one turn of the valid range are wrapped; anything
//! further out is treated as corrupt and clamped. Latitudes are clamped to
//! the range of the configured [`LatitudePolicy`]. Non-finite coordinates
//! are discarded. None of this ever fails: every correction is reported
//! through [`SanitizationStats`].

use ixstats_sanitize_models::{LatitudePolicy, LngLat, LongitudeFix, SanitizationStats};

use crate::geometry::{Polygon, Ring, Shape};

/// Longitudes beyond this magnitude are clamped instead of wrapped.
const MAX_WRAPPABLE_LONGITUDE: f64 = 360.0;

/// A coordinate that survived normalization, with what was done to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedCoordinate {
    pub coord: LngLat,
    pub longitude: LongitudeFix,
    pub latitude_clamped: bool,
}

impl NormalizedCoordinate {
    /// The counters for this one coordinate.
    #[must_use]
    pub fn stats(&self) -> SanitizationStats {
        SanitizationStats {
            coordinates: 1,
            longitudes_wrapped: u64::from(self.longitude == LongitudeFix::Wrapped),
            longitudes_clamped: u64::from(self.longitude == LongitudeFix::Clamped),
            latitudes_clamped: u64::from(self.latitude_clamped),
            ..SanitizationStats::default()
        }
    }
}

/// Normalizes one `(lng, lat)` pair.
///
/// Returns `None` if either value is NaN or infinite; such coordinates must
/// be dropped from the output.
#[must_use]
pub fn normalize_coordinate(
    lng: f64,
    lat: f64,
    policy: LatitudePolicy,
) -> Option<NormalizedCoordinate> {
    if !lng.is_finite() || !lat.is_finite() {
        return None;
    }

    let (lng, longitude) = normalize_longitude(lng);

    let (lat_min, lat_max) = policy.bounds();

    Some(NormalizedCoordinate {
        coord: LngLat::new(lng, lat.clamp(lat_min, lat_max)),
        longitude,
        latitude_clamped: !(lat_min..=lat_max).contains(&lat),
    })
}

/// Brings a finite longitude into `[-180, 180]`.
#[must_use]
pub fn normalize_longitude(lng: f64) -> (f64, LongitudeFix) {
    if lng.abs() > MAX_WRAPPABLE_LONGITUDE {
        return (lng.clamp(-180.0, 180.0), LongitudeFix::Clamped);
    }

    let mut wrapped = lng;
    while wrapped > 180.0 {
        wrapped -= 360.0;
    }
    while wrapped < -180.0 {
        wrapped += 360.0;
    }

    #[allow(clippy::float_cmp)]
    let fix = if wrapped == lng {
        LongitudeFix::Unchanged
    } else {
        LongitudeFix::Wrapped
    };
    (wrapped, fix)
}

/// Normalizes a sequence of coordinates, dropping discarded ones.
#[must_use]
pub fn normalize_coords(
    coords: &[LngLat],
    policy: LatitudePolicy,
) -> (Vec<LngLat>, SanitizationStats) {
    let mut stats = SanitizationStats::default();
    let mut out = Vec::with_capacity(coords.len());

    for c in coords {
        if let Some(normalized) = normalize_coordinate(c.lng, c.lat, policy) {
            stats += normalized.stats();
            out.push(normalized.coord);
        } else {
            stats.coordinates += 1;
            stats.invalid_removed += 1;
        }
    }

    (out, stats)
}

/// Normalizes every vertex of a geometry.
///
/// Rings and lines left empty by discards are removed; a polygon whose
/// exterior ring is left empty is removed with its holes.
#[must_use]
pub fn normalize_shape(shape: &Shape, policy: LatitudePolicy) -> (Shape, SanitizationStats) {
    match shape {
        Shape::Point(point) => {
            let mut stats = SanitizationStats::default();
            let point = point.and_then(|c| {
                let normalized = normalize_coordinate(c.lng, c.lat, policy);
                match normalized {
                    Some(n) => stats += n.stats(),
                    None => {
                        stats.coordinates += 1;
                        stats.invalid_removed += 1;
                    }
                }
                normalized.map(|n| n.coord)
            });
            (Shape::Point(point), stats)
        }
        Shape::MultiPoint(coords) => {
            let (coords, stats) = normalize_coords(coords, policy);
            (Shape::MultiPoint(coords), stats)
        }
        Shape::LineString(coords) => {
            let (coords, stats) = normalize_coords(coords, policy);
            (Shape::LineString(coords), stats)
        }
        Shape::MultiLineString(lines) => {
            let mut stats = SanitizationStats::default();
            let lines = lines
                .iter()
                .filter_map(|line| {
                    let (line, line_stats) = normalize_coords(line, policy);
                    stats += line_stats;
                    (!line.is_empty()).then_some(line)
                })
                .collect();
            (Shape::MultiLineString(lines), stats)
        }
        Shape::Polygon(polygon) => {
            let (polygon, stats) = normalize_polygon(polygon, policy);
            (Shape::Polygon(polygon.unwrap_or_default()), stats)
        }
        Shape::MultiPolygon(polygons) => {
            let mut stats = SanitizationStats::default();
            let polygons = polygons
                .iter()
                .filter_map(|polygon| {
                    let (polygon, polygon_stats) = normalize_polygon(polygon, policy);
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
                    let (shape, shape_stats) = normalize_shape(shape, policy);
                    stats += shape_stats;
                    shape
                })
                .collect();
            (Shape::GeometryCollection(shapes), stats)
        }
    }
}

fn normalize_polygon(
    polygon: &Polygon,
    policy: LatitudePolicy,
) -> (Option<Polygon>, SanitizationStats) {
    let mut stats = SanitizationStats::default();
    let mut rings = Vec::with_capacity(polygon.0.len());

    for (i, ring) in polygon.0.iter().enumerate() {
        let (coords, ring_stats) = normalize_coords(&ring.0, policy);
        stats += ring_stats;
        if coords.is_empty() {
            if i == 0 {
                // Holes are meaningless without their exterior; still count
                // their coordinates.
                for hole in &polygon.0[1..] {
                    stats += normalize_coords(&hole.0, policy).1;
                }
                return (None, stats);
            }
            continue;
        }
        rings.push(Ring(coords));
    }

    (Some(Polygon(rings)), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mercator(lng: f64, lat: f64) -> Option<NormalizedCoordinate> {
        normalize_coordinate(lng, lat, LatitudePolicy::Mercator)
    }

    #[test]
    fn wraps_longitude_just_past_the_antimeridian() {
        let n = mercator(183.5, 10.0).unwrap();
        assert!((n.coord.lng - -176.5).abs() < 1e-12);
        assert!((n.coord.lat - 10.0).abs() < f64::EPSILON);
        assert_eq!(n.longitude, LongitudeFix::Wrapped);
        assert_eq!(n.stats().longitudes_wrapped, 1);
        assert_eq!(n.stats().longitudes_clamped, 0);
    }

    #[test]
    fn wraps_negative_longitude() {
        let n = mercator(-270.0, 0.0).unwrap();
        assert!((n.coord.lng - 90.0).abs() < 1e-12);
        assert_eq!(n.longitude, LongitudeFix::Wrapped);
    }

    #[test]
    fn clamps_extreme_longitude() {
        let n = mercator(400.0, 10.0).unwrap();
        assert!((n.coord.lng - 180.0).abs() < f64::EPSILON);
        assert_eq!(n.longitude, LongitudeFix::Clamped);
        assert_eq!(n.stats().longitudes_clamped, 1);
        assert_eq!(n.stats().longitudes_wrapped, 0);

        let n = mercator(-1000.0, 10.0).unwrap();
        assert!((n.coord.lng - -180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exactly_360_is_wrapped_not_clamped() {
        let n = mercator(360.0, 0.0).unwrap();
        assert!(n.coord.lng.abs() < f64::EPSILON);
        assert_eq!(n.longitude, LongitudeFix::Wrapped);
    }

    #[test]
    fn antimeridian_itself_is_unchanged() {
        assert_eq!(mercator(180.0, 0.0).unwrap().longitude, LongitudeFix::Unchanged);
        assert_eq!(mercator(-180.0, 0.0).unwrap().longitude, LongitudeFix::Unchanged);
    }

    #[test]
    fn clamps_latitude_to_mercator_range() {
        let n = mercator(10.0, 92.0).unwrap();
        assert!((n.coord.lat - 85.051_128_78).abs() < f64::EPSILON);
        assert!(n.latitude_clamped);
        assert_eq!(n.longitude, LongitudeFix::Unchanged);
    }

    #[test]
    fn geographic_policy_keeps_polar_latitudes() {
        let n = normalize_coordinate(10.0, 89.0, LatitudePolicy::Geographic).unwrap();
        assert!((n.coord.lat - 89.0).abs() < f64::EPSILON);
        assert!(!n.latitude_clamped);

        let n = normalize_coordinate(10.0, -95.0, LatitudePolicy::Geographic).unwrap();
        assert!((n.coord.lat - -90.0).abs() < f64::EPSILON);
        assert!(n.latitude_clamped);
    }

    #[test]
    fn discards_non_finite_values() {
        assert!(mercator(f64::NAN, 10.0).is_none());
        assert!(mercator(10.0, f64::INFINITY).is_none());
        assert!(mercator(f64::NEG_INFINITY, 0.0).is_none());
    }

    #[test]
    fn discarded_coordinate_shortens_the_line() {
        let coords = [
            LngLat::new(f64::NAN, 10.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(2.0, 2.0),
        ];
        let (out, stats) = normalize_coords(&coords, LatitudePolicy::Mercator);
        assert_eq!(out.len(), 2);
        assert_eq!(stats.coordinates, 3);
        assert_eq!(stats.invalid_removed, 1);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let coords = [
            LngLat::new(183.5, 10.0),
            LngLat::new(400.0, -88.0),
            LngLat::new(-181.0, 45.0),
        ];
        let (once, _) = normalize_coords(&coords, LatitudePolicy::Mercator);
        let (twice, stats) = normalize_coords(&once, LatitudePolicy::Mercator);
        assert_eq!(once, twice);
        assert_eq!(stats.total_fixes(), 0);
    }

    #[test]
    fn polygon_with_empty_exterior_is_dropped() {
        let shape = Shape::MultiPolygon(vec![
            Polygon(vec![
                Ring(vec![LngLat::new(f64::NAN, 0.0), LngLat::new(0.0, f64::NAN)]),
                Ring(vec![LngLat::new(1.0, 1.0)]),
            ]),
            Polygon(vec![Ring(vec![
                LngLat::new(0.0, 0.0),
                LngLat::new(1.0, 0.0),
                LngLat::new(1.0, 1.0),
            ])]),
        ]);
        let (shape, stats) = normalize_shape(&shape, LatitudePolicy::Mercator);
        let Shape::MultiPolygon(polygons) = shape else {
            panic!("geometry type must be preserved");
        };
        assert_eq!(polygons.len(), 1);
        assert_eq!(stats.coordinates, 6);
        assert_eq!(stats.invalid_removed, 2);
    }

    #[test]
    fn fully_invalid_point_becomes_empty() {
        let (shape, stats) = normalize_shape(
            &Shape::Point(Some(LngLat::new(f64::NAN, 1.0))),
            LatitudePolicy::Mercator,
        );
        assert_eq!(shape, Shape::Point(None));
        assert_eq!(stats.invalid_removed, 1);
    }
}
