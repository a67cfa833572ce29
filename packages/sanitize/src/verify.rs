//! Post-hoc checks that a collection satisfies the sanitizer's output
//! guarantees.
//!
//! Used by the `verify` command on already-written layers and by tests on
//! fresh pipeline output.

use std::fmt;
use std::path::Path;

use ixstats_sanitize_models::{DEFAULT_EPSILON, LatitudePolicy, LayerDefinition, LngLat};
use serde_json::Value;

use crate::SanitizeError;
use crate::geometry::{Polygon, Ring, Shape};
use crate::pipeline::{feature_id, features, read_collection};

/// What a collection is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyOptions {
    pub latitude_policy: LatitudePolicy,
    pub epsilon: f64,
    /// Largest allowed `|lng|`. `180` for sanitized output; dateline
    /// output may legitimately reach past it.
    pub max_abs_longitude: f64,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            latitude_policy: LatitudePolicy::default(),
            epsilon: DEFAULT_EPSILON,
            max_abs_longitude: 180.0,
        }
    }
}

/// What is wrong with a coordinate or ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViolationKind {
    NonFinite,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
    UnclosedRing,
    ZeroLengthEdge { vertex: usize },
}

/// One broken guarantee, located by feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub feature_index: usize,
    pub feature_id: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature {} ({}): ", self.feature_index, self.feature_id)?;
        match self.kind {
            ViolationKind::NonFinite => write!(f, "non-finite coordinate"),
            ViolationKind::LongitudeOutOfRange(lng) => write!(f, "longitude {lng} out of range"),
            ViolationKind::LatitudeOutOfRange(lat) => write!(f, "latitude {lat} out of range"),
            ViolationKind::UnclosedRing => write!(f, "ring is not closed"),
            ViolationKind::ZeroLengthEdge { vertex } => {
                write!(f, "zero-length edge at vertex {vertex}")
            }
        }
    }
}

/// Checks every feature of a collection. Violations name their feature
/// through `id_properties` the same way the sanitizer's logs do.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] or [`SanitizeError::Geometry`] if
/// the document is structurally invalid.
pub fn verify_collection(
    collection: &Value,
    id_properties: &[String],
    options: &VerifyOptions,
) -> Result<Vec<Violation>, SanitizeError> {
    let mut violations = Vec::new();

    for (index, feature) in features(collection)?.iter().enumerate() {
        let shape = match feature.get("geometry") {
            None | Some(Value::Null) => continue,
            Some(geometry) => Shape::from_json(geometry)?,
        };

        let mut kinds = Vec::new();
        check_shape(&shape, options, &mut kinds);
        if kinds.is_empty() {
            continue;
        }

        let id = feature_id(feature, id_properties);
        violations.extend(kinds.into_iter().map(|kind| Violation {
            feature_index: index,
            feature_id: id.clone(),
            kind,
        }));
    }

    Ok(violations)
}

/// Reads `<dir>/<layer>.geojson` and checks it.
///
/// # Errors
///
/// Returns any error from reading or parsing the file.
pub fn verify_layer(
    layer: &LayerDefinition,
    dir: &Path,
    options: &VerifyOptions,
) -> Result<Vec<Violation>, SanitizeError> {
    let collection = read_collection(&dir.join(layer.file_name()))?;
    verify_collection(&collection, &layer.id_properties, options)
}

fn check_shape(shape: &Shape, options: &VerifyOptions, out: &mut Vec<ViolationKind>) {
    shape.for_each_coord(&mut |c| check_coord(c, options, out));

    match shape {
        Shape::Polygon(polygon) => check_polygon(polygon, options.epsilon, out),
        Shape::MultiPolygon(polygons) => {
            for polygon in polygons {
                check_polygon(polygon, options.epsilon, out);
            }
        }
        Shape::GeometryCollection(shapes) => {
            // Coordinates were already visited above.
            for member in shapes {
                match member {
                    Shape::Polygon(polygon) => check_polygon(polygon, options.epsilon, out),
                    Shape::MultiPolygon(polygons) => {
                        for polygon in polygons {
                            check_polygon(polygon, options.epsilon, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        Shape::Point(_) | Shape::MultiPoint(_) | Shape::LineString(_) | Shape::MultiLineString(_) => {}
    }
}

fn check_coord(c: &LngLat, options: &VerifyOptions, out: &mut Vec<ViolationKind>) {
    if !c.is_finite() {
        out.push(ViolationKind::NonFinite);
        return;
    }
    if c.lng.abs() > options.max_abs_longitude {
        out.push(ViolationKind::LongitudeOutOfRange(c.lng));
    }
    let (min, max) = options.latitude_policy.bounds();
    if !(min..=max).contains(&c.lat) {
        out.push(ViolationKind::LatitudeOutOfRange(c.lat));
    }
}

fn check_polygon(polygon: &Polygon, epsilon: f64, out: &mut Vec<ViolationKind>) {
    for ring in &polygon.0 {
        check_ring(ring, epsilon, out);
    }
}

fn check_ring(ring: &Ring, epsilon: f64, out: &mut Vec<ViolationKind>) {
    for (i, pair) in ring.0.windows(2).enumerate() {
        if pair[0].approx_eq(&pair[1], epsilon) {
            out.push(ViolationKind::ZeroLengthEdge { vertex: i + 1 });
        }
    }
    if ring.len() >= 3 && ring.0.first() != ring.0.last() {
        out.push(ViolationKind::UnclosedRing);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection(geometry: Value) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "id": "f1", "properties": {}, "geometry": geometry}]
        })
    }

    fn kinds(geometry: Value, options: &VerifyOptions) -> Vec<ViolationKind> {
        verify_collection(&collection(geometry), &[], options)
            .unwrap()
            .into_iter()
            .map(|v| v.kind)
            .collect()
    }

    #[test]
    fn clean_polygon_passes() {
        let found = kinds(
            json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}),
            &VerifyOptions::default(),
        );
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn reports_out_of_range_coordinates() {
        let found = kinds(
            json!({"type": "LineString", "coordinates": [[183.5, 10], [10, 89]]}),
            &VerifyOptions::default(),
        );
        assert_eq!(
            found,
            [
                ViolationKind::LongitudeOutOfRange(183.5),
                ViolationKind::LatitudeOutOfRange(89.0)
            ]
        );
    }

    #[test]
    fn geographic_policy_accepts_polar_latitudes() {
        let options = VerifyOptions {
            latitude_policy: LatitudePolicy::Geographic,
            ..VerifyOptions::default()
        };
        let found = kinds(json!({"type": "Point", "coordinates": [10, 89]}), &options);
        assert!(found.is_empty());
    }

    #[test]
    fn shifted_output_can_be_allowed_past_the_antimeridian() {
        let options = VerifyOptions {
            max_abs_longitude: 360.0,
            ..VerifyOptions::default()
        };
        let found = kinds(
            json!({"type": "Polygon", "coordinates": [[[180, -17], [182, -17], [182, -16], [180, -17]]]}),
            &options,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn reports_non_finite_members() {
        let found = kinds(
            json!({"type": "Point", "coordinates": [null, 1]}),
            &VerifyOptions::default(),
        );
        assert_eq!(found, [ViolationKind::NonFinite]);
    }

    #[test]
    fn reports_ring_defects() {
        let found = kinds(
            json!({"type": "MultiPolygon", "coordinates": [
                [[[0, 0], [0, 0], [1, 0], [1, 1], [0, 0]]],
                [[[5, 5], [6, 5], [6, 6]]]
            ]}),
            &VerifyOptions::default(),
        );
        assert_eq!(
            found,
            [
                ViolationKind::ZeroLengthEdge { vertex: 1 },
                ViolationKind::UnclosedRing
            ]
        );
    }

    #[test]
    fn violation_names_its_feature() {
        let violations = verify_collection(
            &collection(json!({"type": "Point", "coordinates": [200, 0]})),
            &[],
            &VerifyOptions::default(),
        )
        .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "feature 0 (f1): longitude 200 out of range"
        );
    }

    #[test]
    fn empty_and_null_geometries_pass() {
        let found = kinds(json!({"type": "Point", "coordinates": []}), &VerifyOptions::default());
        assert!(found.is_empty());
        let violations =
            verify_collection(&collection(Value::Null), &[], &VerifyOptions::default()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn violations_use_the_layer_id_properties() {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Caphiria", "iso_code": "CAP"},
                "geometry": {"type": "Point", "coordinates": [200, 0]}
            }]
        });

        let by_code = verify_collection(
            &collection,
            &["iso_code".to_string(), "name".to_string()],
            &VerifyOptions::default(),
        )
        .unwrap();
        assert_eq!(by_code[0].feature_id, "CAP");

        let by_name =
            verify_collection(&collection, &["name".to_string()], &VerifyOptions::default())
                .unwrap();
        assert_eq!(by_name[0].feature_id, "Caphiria");
    }
}
