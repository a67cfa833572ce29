//! Dateline repair for polygons of antimeridian-crossing features.
//!
//! A landmass straddling ±180° is often emitted with some vertices near
//! `+179` and others near `-179`, which reads as a feature spanning the
//! whole globe. A feature is only considered when it spans more than 180°
//! *and* actually reaches the antimeridian: it has vertices within
//! [`ANTIMERIDIAN_BAND`] of both `-180` and `+180`, or one of its rings has
//! an edge jumping more than 180°. Nations whose territories are merely
//! spread around the globe are left alone.
//!
//! Each polygon of such a feature is then examined on its own:
//!
//! - polygons entirely on the home side of the threshold stay put,
//! - polygons entirely on the far side are translated as a whole by ±360°,
//! - polygons that straddle the dateline themselves are flagged for manual
//!   review, re-expressed in the one 360° window that begins at the
//!   threshold ([`DatelineStrategy::Reanchor`]), or cut in two at ±180°
//!   ([`DatelineStrategy::Split`]).
//!
//! If translating leaves the feature wider than 180° (or wider than it was)
//! the whole feature is put back as it was and flagged.

use ixstats_sanitize_models::{
    DatelineAnomaly, DatelineConfig, DatelineStats, DatelineStrategy, Hemisphere, LngLat,
};

use crate::geometry::{Polygon, Ring, Shape, lng_range};

/// Longitude span beyond which a geometry is assumed to wrap falsely.
pub const MAX_LONGITUDE_SPAN: f64 = 180.0;

/// Distance from ±180° within which a vertex counts as touching the
/// antimeridian.
pub const ANTIMERIDIAN_BAND: f64 = 10.0;

/// Smallest closed ring a cut part may form.
const MIN_PART_POINTS: usize = 4;

/// What the dateline pass did with one polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolygonDecision {
    Unchanged,
    /// Every vertex moved by the same amount.
    Shifted(f64),
    /// Far-side vertices moved into the home window.
    Reanchored,
    /// Straddles the dateline and could not be placed on one side.
    Ambiguous,
}

/// Whether any edge of the ring jumps more than 180° in longitude.
#[must_use]
pub fn crosses_dateline(ring: &Ring) -> bool {
    ring.0
        .windows(2)
        .any(|pair| (pair[1].lng - pair[0].lng).abs() > MAX_LONGITUDE_SPAN)
}

/// Whether a set of polygons reaches the antimeridian from both sides.
fn touches_antimeridian(min_lng: f64, max_lng: f64) -> bool {
    let edge = 180.0 - ANTIMERIDIAN_BAND;
    min_lng < -edge && max_lng > edge
}

fn span(polygons: &[Polygon]) -> Option<(f64, f64)> {
    lng_range(polygons.iter().flat_map(Polygon::coords))
}

/// Runs the dateline pass over a feature's geometry.
///
/// Only `Polygon` and `MultiPolygon` geometries are considered; anything
/// else is returned unchanged. The geometry type is always preserved.
#[must_use]
pub fn split_dateline(
    shape: &Shape,
    feature_id: &str,
    config: &DatelineConfig,
) -> (Shape, DatelineStats) {
    let mut stats = DatelineStats {
        features: 1,
        ..DatelineStats::default()
    };

    let polygons: &[Polygon] = match shape {
        Shape::Polygon(polygon) => std::slice::from_ref(polygon),
        Shape::MultiPolygon(polygons) => polygons,
        _ => return (shape.clone(), stats),
    };

    stats.crossing_polygons = polygons
        .iter()
        .filter(|polygon| polygon.0.iter().any(crosses_dateline))
        .count() as u64;

    let Some((min_before, max_before)) = span(polygons) else {
        return (shape.clone(), stats);
    };
    let span_before = max_before - min_before;
    if span_before <= MAX_LONGITUDE_SPAN
        || !(touches_antimeridian(min_before, max_before) || stats.crossing_polygons > 0)
    {
        return (shape.clone(), stats);
    }
    stats.wide_features = 1;

    if config.strategy == DatelineStrategy::Split {
        return cut_feature(shape, polygons, feature_id, stats);
    }

    let mut shifted = 0;
    let mut reanchored = 0;
    let mut repaired = Vec::with_capacity(polygons.len());
    for (index, polygon) in polygons.iter().enumerate() {
        let (polygon, decision) = repair_polygon(polygon, config);
        match decision {
            PolygonDecision::Unchanged => {}
            PolygonDecision::Shifted(delta) => {
                log::debug!("{feature_id}: shifted polygon {index} by {delta}");
                shifted += 1;
            }
            PolygonDecision::Reanchored => {
                log::debug!("{feature_id}: re-anchored polygon {index}");
                reanchored += 1;
            }
            PolygonDecision::Ambiguous => {
                let (min_lng, max_lng) = polygon.lng_range().unwrap_or((0.0, 0.0));
                log::warn!(
                    "{feature_id}: polygon {index} spans [{min_lng:.1}, {max_lng:.1}] \
                     and cannot be placed on one side of the dateline; left for manual review"
                );
                stats.anomalies.push(DatelineAnomaly {
                    feature_id: feature_id.to_string(),
                    polygon_index: Some(index),
                    min_lng,
                    max_lng,
                });
            }
        }
        repaired.push(polygon);
    }

    if let Some((min_after, max_after)) = span(&repaired) {
        let span_after = max_after - min_after;
        let unresolved = span_after > MAX_LONGITUDE_SPAN && stats.anomalies.is_empty();
        if unresolved || span_after > span_before {
            log::warn!(
                "{feature_id}: shifting would span [{min_after:.1}, {max_after:.1}]; \
                 feature left as it was for manual review"
            );
            stats.anomalies.push(DatelineAnomaly {
                feature_id: feature_id.to_string(),
                polygon_index: None,
                min_lng: min_before,
                max_lng: max_before,
            });
            return (shape.clone(), stats);
        }
    }

    stats.polygons_shifted = shifted;
    stats.polygons_reanchored = reanchored;

    let shape = match shape {
        Shape::Polygon(_) => Shape::Polygon(repaired.into_iter().next().unwrap_or_default()),
        _ => Shape::MultiPolygon(repaired),
    };
    (shape, stats)
}

/// Decides and applies the treatment of one polygon of a wide feature.
#[must_use]
pub fn repair_polygon(polygon: &Polygon, config: &DatelineConfig) -> (Polygon, PolygonDecision) {
    let is_far = |c: &LngLat| {
        let lng = c.lng + config.meridian_offset;
        match config.home {
            Hemisphere::East => lng < config.threshold,
            Hemisphere::West => lng > config.threshold,
        }
    };

    let far = polygon.coords().filter(|c| is_far(c)).count();
    let total = polygon.coords().count();

    if far == 0 {
        return (polygon.clone(), PolygonDecision::Unchanged);
    }

    let delta = config.home.shift();
    if far == total {
        return (
            translate(polygon, |_| delta),
            PolygonDecision::Shifted(delta),
        );
    }

    let own_span = polygon.lng_range().map_or(0.0, |(min, max)| max - min);
    if own_span <= MAX_LONGITUDE_SPAN {
        return (polygon.clone(), PolygonDecision::Unchanged);
    }

    match config.strategy {
        DatelineStrategy::Uniform | DatelineStrategy::Split => {
            (polygon.clone(), PolygonDecision::Ambiguous)
        }
        DatelineStrategy::Reanchor => {
            let candidate = translate(polygon, |c| if is_far(c) { delta } else { 0.0 });
            let new_span = candidate.lng_range().map_or(0.0, |(min, max)| max - min);
            if new_span <= MAX_LONGITUDE_SPAN {
                (candidate, PolygonDecision::Reanchored)
            } else {
                (polygon.clone(), PolygonDecision::Ambiguous)
            }
        }
    }
}

fn translate(polygon: &Polygon, delta: impl Fn(&LngLat) -> f64) -> Polygon {
    Polygon(
        polygon
            .0
            .iter()
            .map(|ring| {
                Ring(
                    ring.0
                        .iter()
                        .map(|c| LngLat::new(c.lng + delta(c), c.lat))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Cuts every crossing polygon of a feature at ±180°.
fn cut_feature(
    shape: &Shape,
    polygons: &[Polygon],
    feature_id: &str,
    mut stats: DatelineStats,
) -> (Shape, DatelineStats) {
    let mut out = Vec::with_capacity(polygons.len() + 1);

    for (index, polygon) in polygons.iter().enumerate() {
        let exterior_crosses = polygon.0.first().is_some_and(crosses_dateline);
        if !exterior_crosses {
            out.push(polygon.clone());
            continue;
        }

        let parts = cut_polygon(polygon).filter(|parts| {
            parts.len() == 1 || matches!(shape, Shape::MultiPolygon(_))
        });
        if let Some(parts) = parts {
            log::debug!("{feature_id}: cut polygon {index} into {} part(s)", parts.len());
            stats.polygons_split += 1;
            out.extend(parts);
        } else {
            let (min_lng, max_lng) = polygon.lng_range().unwrap_or((0.0, 0.0));
            log::warn!(
                "{feature_id}: polygon {index} cannot be cut at the dateline \
                 without changing its geometry type; left for manual review"
            );
            stats.anomalies.push(DatelineAnomaly {
                feature_id: feature_id.to_string(),
                polygon_index: Some(index),
                min_lng,
                max_lng,
            });
            out.push(polygon.clone());
        }
    }

    let shape = match shape {
        Shape::Polygon(_) => Shape::Polygon(out.into_iter().next().unwrap_or_default()),
        _ => Shape::MultiPolygon(out),
    };
    (shape, stats)
}

/// Cuts a polygon whose exterior ring jumps the dateline into parts that
/// each stay inside `[-180, 180]`.
///
/// Holes that do not cross are attached to the first part on their side;
/// crossing holes are dropped. Returns `None` if the exterior does not
/// cross, crosses an odd number of times (a ring around a pole), or leaves
/// no valid part.
#[must_use]
pub fn cut_polygon(polygon: &Polygon) -> Option<Vec<Polygon>> {
    let (exterior, holes) = polygon.0.split_first()?;
    let pieces = cut_ring(exterior)?;

    let mut parts: Vec<Polygon> = pieces
        .into_iter()
        .filter(|ring| ring.len() >= MIN_PART_POINTS)
        .map(|ring| Polygon(vec![ring]))
        .collect();
    if parts.is_empty() {
        return None;
    }

    for hole in holes {
        if crosses_dateline(hole) {
            log::debug!("dropping a hole that crosses the dateline");
            continue;
        }
        let east = is_east(hole);
        if let Some(part) = parts.iter_mut().find(|p| p.0.first().map(is_east) == Some(east)) {
            part.0.push(hole.clone());
        }
    }

    Some(parts)
}

fn is_east(ring: &Ring) -> bool {
    lng_range(&ring.0).is_some_and(|(min, max)| min + max >= 0.0)
}

/// Cuts a closed ring at every edge that jumps more than 180°, inserting a
/// vertex at ±180° with the latitude interpolated along the edge.
fn cut_ring(ring: &Ring) -> Option<Vec<Ring>> {
    let mut pieces: Vec<Vec<LngLat>> = Vec::new();
    let mut current = Vec::new();

    for pair in ring.0.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        current.push(a);
        if (b.lng - a.lng).abs() <= MAX_LONGITUDE_SPAN {
            continue;
        }

        let (edge, opposite) = if a.lng > 0.0 {
            (180.0, -180.0)
        } else {
            (-180.0, 180.0)
        };
        let run = b.lng + (edge - opposite) - a.lng;
        let ratio = if run.abs() < f64::EPSILON {
            0.0
        } else {
            (edge - a.lng) / run
        };
        let lat = ratio.mul_add(b.lat - a.lat, a.lat);

        current.push(LngLat::new(edge, lat));
        pieces.push(std::mem::take(&mut current));
        current.push(LngLat::new(opposite, lat));
    }

    let crossings = pieces.len();
    if crossings == 0 || !crossings.is_multiple_of(2) || ring.0.first() != ring.0.last() {
        return None;
    }

    // The ring ends where it started, so the last piece continues the first.
    if let Some(last) = ring.0.last() {
        current.push(*last);
    }
    let first = pieces.remove(0);
    current.extend(first.into_iter().skip(1));
    pieces.insert(0, current);

    Some(
        pieces
            .into_iter()
            .map(|mut points| {
                if points.first() != points.last() {
                    if let Some(&start) = points.first() {
                        points.push(start);
                    }
                }
                Ring(points)
            })
            .collect(),
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    fn square(min_lng: f64, max_lng: f64, lat: f64) -> Polygon {
        Polygon(vec![Ring(vec![
            LngLat::new(min_lng, lat),
            LngLat::new(max_lng, lat),
            LngLat::new(max_lng, lat + 1.0),
            LngLat::new(min_lng, lat + 1.0),
            LngLat::new(min_lng, lat),
        ])])
    }

    fn ring(points: &[(f64, f64)]) -> Ring {
        Ring(points.iter().map(|&(lng, lat)| LngLat::new(lng, lat)).collect())
    }

    /// A ring whose first and third edges jump the dateline.
    fn crossing_polygon() -> Polygon {
        Polygon(vec![ring(&[
            (170.0, 0.0),
            (-170.0, 20.0),
            (-170.0, 30.0),
            (170.0, 30.0),
            (170.0, 0.0),
        ])])
    }

    fn split() -> DatelineConfig {
        DatelineConfig {
            strategy: DatelineStrategy::Split,
            ..DatelineConfig::default()
        }
    }

    fn reanchor() -> DatelineConfig {
        DatelineConfig {
            strategy: DatelineStrategy::Reanchor,
            ..DatelineConfig::default()
        }
    }

    #[test]
    fn narrow_feature_is_untouched() {
        let shape = Shape::MultiPolygon(vec![square(10.0, 20.0, 0.0), square(30.0, 40.0, 5.0)]);
        let (out, stats) = split_dateline(&shape, "a", &DatelineConfig::default());
        assert_eq!(out, shape);
        assert_eq!(stats.wide_features, 0);
        assert_eq!(stats.features, 1);
    }

    #[test]
    fn shifts_only_the_far_side_island() {
        let shape = Shape::MultiPolygon(vec![
            square(177.0, 179.0, -17.0),
            square(-180.0, -178.0, -17.0),
        ]);
        let (out, stats) = split_dateline(&shape, "fiji", &DatelineConfig::default());

        let Shape::MultiPolygon(polygons) = out else {
            panic!("geometry type must be preserved");
        };
        assert_eq!(polygons[0], square(177.0, 179.0, -17.0));
        assert_eq!(polygons[1], square(180.0, 182.0, -17.0));
        assert_eq!(stats.polygons_shifted, 1);
        assert!(stats.anomalies.is_empty());

        let (min, max) = lng_range(polygons.iter().flat_map(Polygon::coords)).unwrap();
        assert!(max - min <= MAX_LONGITUDE_SPAN);
    }

    #[test]
    fn uniform_shift_moves_every_vertex_by_the_same_amount() {
        let original = square(-175.0, -170.0, 60.0);
        let (shifted, decision) = repair_polygon(&original, &DatelineConfig::default());
        assert_eq!(decision, PolygonDecision::Shifted(360.0));

        for (before, after) in original.coords().zip(shifted.coords()) {
            assert!((after.lng - before.lng - 360.0).abs() < 1e-9);
            assert!((after.lat - before.lat).abs() < f64::EPSILON);
        }
        let (min, max) = shifted.lng_range().unwrap();
        assert!(max - min <= MAX_LONGITUDE_SPAN);
    }

    #[test]
    fn west_home_shifts_positive_polygons_down() {
        let config = DatelineConfig {
            home: Hemisphere::West,
            ..DatelineConfig::default()
        };
        let shape = Shape::MultiPolygon(vec![
            square(172.0, 179.0, 52.0),
            square(-175.0, -165.0, 55.0),
        ]);
        let (out, stats) = split_dateline(&shape, "aleutians", &config);
        let Shape::MultiPolygon(polygons) = out else {
            panic!("geometry type must be preserved");
        };
        assert_eq!(polygons[0], square(-188.0, -181.0, 52.0));
        assert_eq!(polygons[1], square(-175.0, -165.0, 55.0));
        assert_eq!(stats.polygons_shifted, 1);
    }

    #[test]
    fn straddling_polygon_is_flagged_under_uniform_strategy() {
        let shape = Shape::Polygon(square(-179.0, 179.0, -16.0));
        let (out, stats) = split_dateline(&shape, "straddler", &DatelineConfig::default());
        assert_eq!(out, shape);
        assert_eq!(stats.anomalies.len(), 1);
        assert_eq!(stats.anomalies[0].feature_id, "straddler");
        assert_eq!(stats.anomalies[0].polygon_index, Some(0));
        assert_eq!(stats.crossing_polygons, 1);
    }

    #[test]
    fn reanchors_straddling_polygon_and_leaves_its_neighbour() {
        let first = square(170.0, 190.0, 0.0);
        let second = square(-179.0, 179.0, 10.0);
        let shape = Shape::MultiPolygon(vec![first.clone(), second]);

        let (out, stats) = split_dateline(&shape, "mixed", &reanchor());
        let Shape::MultiPolygon(polygons) = out else {
            panic!("geometry type must be preserved");
        };

        assert_eq!(polygons[0], first);
        assert_eq!(polygons[1], square(181.0, 179.0, 10.0));
        let (min, max) = polygons[1].lng_range().unwrap();
        assert!(max - min <= MAX_LONGITUDE_SPAN);
        assert_eq!(stats.polygons_reanchored, 1);
        assert!(stats.anomalies.is_empty());
    }

    #[test]
    fn globe_spanning_polygon_stays_ambiguous_even_when_reanchoring() {
        // Vertices spread all the way around: no window makes it narrow.
        let polygon = Polygon(vec![Ring(vec![
            LngLat::new(-179.0, -80.0),
            LngLat::new(-90.0, -80.0),
            LngLat::new(0.0, -80.0),
            LngLat::new(90.0, -80.0),
            LngLat::new(179.0, -80.0),
            LngLat::new(-179.0, -80.0),
        ])]);
        let (out, decision) = repair_polygon(&polygon, &reanchor());
        assert_eq!(decision, PolygonDecision::Ambiguous);
        assert_eq!(out, polygon);
    }

    #[test]
    fn polygon_straddling_only_the_threshold_is_untouched() {
        let polygon = square(-10.0, 10.0, 0.0);
        let (out, decision) = repair_polygon(&polygon, &DatelineConfig::default());
        assert_eq!(decision, PolygonDecision::Unchanged);
        assert_eq!(out, polygon);
    }

    #[test]
    fn meridian_offset_moves_the_split_point() {
        // With a +26.09 offset, -20 reads as +6.09 and is on the home side.
        let config = DatelineConfig {
            meridian_offset: 26.09,
            ..DatelineConfig::default()
        };
        let (_, decision) = repair_polygon(&square(-20.0, -15.0, 0.0), &config);
        assert_eq!(decision, PolygonDecision::Unchanged);

        let (_, decision) = repair_polygon(&square(-40.0, -30.0, 0.0), &config);
        assert_eq!(decision, PolygonDecision::Shifted(360.0));
    }

    #[test]
    fn detects_edge_jumping_the_dateline() {
        assert!(crosses_dateline(&Ring(vec![
            LngLat::new(179.0, 0.0),
            LngLat::new(-179.0, 0.0),
        ])));
        assert!(!crosses_dateline(&Ring(vec![
            LngLat::new(179.0, 0.0),
            LngLat::new(181.0, 0.0),
        ])));
    }

    #[test]
    fn non_polygonal_geometry_passes_through() {
        let line = Shape::LineString(vec![LngLat::new(-179.0, 0.0), LngLat::new(179.0, 0.0)]);
        let (out, stats) = split_dateline(&line, "line", &DatelineConfig::default());
        assert_eq!(out, line);
        assert_eq!(stats.wide_features, 0);
    }

    #[test]
    fn territories_spread_around_the_globe_are_untouched() {
        let shape = Shape::MultiPolygon(vec![
            square(-150.0, -149.0, 20.0),
            square(-54.0, -52.0, 4.0),
            square(-5.0, 8.0, 45.0),
            square(55.0, 56.0, -21.0),
        ]);
        let (out, stats) = split_dateline(&shape, "france", &DatelineConfig::default());
        assert_eq!(out, shape);
        assert_eq!(stats.wide_features, 0);
        assert_eq!(stats.polygons_shifted, 0);
        assert!(stats.anomalies.is_empty());
    }

    #[test]
    fn shift_that_leaves_the_feature_wide_is_rolled_back() {
        // Moving the first island to 181..182 would stretch the feature to
        // -5..182 because of the polygon around the prime meridian.
        let shape = Shape::MultiPolygon(vec![
            square(-179.0, -178.0, 0.0),
            square(175.0, 179.0, 0.0),
            square(-5.0, 8.0, 50.0),
        ]);
        let (out, stats) = split_dateline(&shape, "scattered", &DatelineConfig::default());

        assert_eq!(out, shape);
        assert_eq!(stats.wide_features, 1);
        assert_eq!(stats.polygons_shifted, 0);
        assert_eq!(stats.anomalies.len(), 1);
        let anomaly = &stats.anomalies[0];
        assert_eq!(anomaly.feature_id, "scattered");
        assert_eq!(anomaly.polygon_index, None);
        assert!((anomaly.min_lng - -179.0).abs() < f64::EPSILON);
        assert!((anomaly.max_lng - 179.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cuts_a_crossing_ring_at_the_dateline() {
        let parts = cut_polygon(&crossing_polygon()).unwrap();
        assert_eq!(parts.len(), 2);

        // The first edge runs from (170, 0) to (-170, 20): halfway in
        // longitude, so it meets the dateline at latitude 10.
        assert_eq!(
            parts[0].0[0],
            ring(&[
                (180.0, 30.0),
                (170.0, 30.0),
                (170.0, 0.0),
                (180.0, 10.0),
                (180.0, 30.0),
            ])
        );
        assert_eq!(
            parts[1].0[0],
            ring(&[
                (-180.0, 10.0),
                (-170.0, 20.0),
                (-170.0, 30.0),
                (-180.0, 30.0),
                (-180.0, 10.0),
            ])
        );
        for part in &parts {
            let exterior = &part.0[0];
            assert_eq!(exterior.0.first(), exterior.0.last());
            assert!(!crosses_dateline(exterior));
            assert!(part.coords().all(|c| c.lng.abs() <= 180.0));
        }
    }

    #[test]
    fn holes_follow_the_part_on_their_side() {
        let polygon = Polygon(vec![
            ring(&[
                (170.0, -10.0),
                (-170.0, -10.0),
                (-170.0, 10.0),
                (170.0, 10.0),
                (170.0, -10.0),
            ]),
            square(172.0, 174.0, 0.0).0.remove(0),
        ]);
        let parts = cut_polygon(&polygon).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0.len(), 2);
        assert_eq!(parts[1].0.len(), 1);
        assert!(parts[1].coords().all(|c| c.lng < 0.0));
    }

    #[test]
    fn ring_around_a_pole_cannot_be_cut() {
        let polygon = Polygon(vec![ring(&[
            (170.0, 80.0),
            (-170.0, 80.0),
            (-90.0, 80.0),
            (0.0, 80.0),
            (90.0, 80.0),
            (170.0, 80.0),
        ])]);
        assert_eq!(cut_polygon(&polygon), None);
    }

    #[test]
    fn split_strategy_cuts_multipolygon_members() {
        let neighbour = square(100.0, 110.0, 0.0);
        let shape = Shape::MultiPolygon(vec![crossing_polygon(), neighbour.clone()]);
        let (out, stats) = split_dateline(&shape, "chukotka", &split());

        let Shape::MultiPolygon(polygons) = out else {
            panic!("geometry type must be preserved");
        };
        assert_eq!(polygons.len(), 3);
        assert_eq!(polygons[2], neighbour);
        assert!(
            polygons
                .iter()
                .flat_map(Polygon::coords)
                .all(|c| c.lng.abs() <= 180.0)
        );
        assert_eq!(stats.wide_features, 1);
        assert_eq!(stats.polygons_split, 1);
        assert_eq!(stats.polygons_shifted, 0);
        assert!(stats.anomalies.is_empty());
    }

    #[test]
    fn split_strategy_flags_single_polygon_features() {
        let shape = Shape::Polygon(crossing_polygon());
        let (out, stats) = split_dateline(&shape, "sliver", &split());
        assert_eq!(out, shape);
        assert_eq!(stats.polygons_split, 0);
        assert_eq!(stats.anomalies.len(), 1);
        assert_eq!(stats.anomalies[0].polygon_index, Some(0));
    }
}
