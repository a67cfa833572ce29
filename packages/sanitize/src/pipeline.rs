//! Per-layer orchestration of the sanitizer stages.
//!
//! A sanitize run moves each layer through `Loaded → Normalized →
//! Repaired → Written`; a dateline run through `Loaded → Shifted →
//! Written`. Layers are independent: a read, parse or write failure is
//! logged, recorded in that layer's [`LayerReport`], and the run moves on.
//!
//! Everything except geometry coordinates is copied through untouched,
//! and features are never dropped, so output collections have the same
//! features in the same order as their inputs.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;
use std::sync::Arc;

use ixstats_sanitize_models::{
    DatelineStats, LayerDefinition, LayerReport, LayerStage, PipelineConfig, RunReport,
    SanitizationStats,
};
use serde_json::Value;

use crate::SanitizeError;
use crate::dateline::split_dateline;
use crate::geometry::{Shape, union_bounds};
use crate::normalize::normalize_shape;
use crate::progress::ProgressCallback;
use crate::ring::repair_shape;

/// Geometry members replaced by the sanitizer. Everything else on a
/// geometry object is preserved.
const GEOMETRY_MEMBERS: &[&str] = &["type", "coordinates", "geometries", "bbox"];

/// A sanitized layer, ready to be written.
#[derive(Debug, Clone)]
pub struct SanitizedCollection {
    pub collection: Value,
    pub stats: SanitizationStats,
    /// Ids of features whose geometry has no coordinates left.
    pub emptied_features: Vec<String>,
    /// Bounds of every output coordinate.
    pub bounds: Option<[f64; 4]>,
}

/// Reads a `GeoJSON` `FeatureCollection` from disk.
///
/// # Errors
///
/// Returns [`SanitizeError::Io`] if the file cannot be opened,
/// [`SanitizeError::Json`] if it is not JSON, or
/// [`SanitizeError::Collection`] if it is not a `FeatureCollection`.
pub fn read_collection(path: &Path) -> Result<Value, SanitizeError> {
    let file = File::open(path).map_err(|e| SanitizeError::io(path, e))?;
    let collection: Value = serde_json::from_reader(BufReader::new(file))?;
    features(&collection)?;
    Ok(collection)
}

/// Writes a collection as compact JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`SanitizeError::Io`] on any filesystem failure.
pub fn write_collection(path: &Path, collection: &Value) -> Result<(), SanitizeError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SanitizeError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| SanitizeError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush().map_err(|e| SanitizeError::io(path, e))?;
    Ok(())
}

/// Returns the `features` array of a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] if `type` is not
/// `FeatureCollection` or `features` is not an array.
pub fn features(collection: &Value) -> Result<&Vec<Value>, SanitizeError> {
    let kind = collection.get("type").and_then(Value::as_str);
    if kind != Some("FeatureCollection") {
        return Err(SanitizeError::Collection {
            message: format!("expected type FeatureCollection, found {kind:?}"),
        });
    }
    collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| SanitizeError::Collection {
            message: "missing \"features\" array".to_string(),
        })
}

/// Identifies a feature for logs and reports.
///
/// Uses the feature's `id` member, then the first of `id_properties` that
/// holds a string or number, then `"unknown"`.
#[must_use]
pub fn feature_id(feature: &Value, id_properties: &[String]) -> String {
    let as_id = |value: &Value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    if let Some(id) = feature.get("id").and_then(as_id) {
        return id;
    }

    let properties = feature.get("properties");
    id_properties
        .iter()
        .find_map(|name| properties.and_then(|p| p.get(name)).and_then(as_id))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Parses every feature geometry. `None` marks a null or absent geometry.
fn parse_shapes(features: &[Value]) -> Result<Vec<Option<Shape>>, SanitizeError> {
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| match feature.get("geometry") {
            None | Some(Value::Null) => Ok(None),
            Some(geometry) => Shape::from_json(geometry).map(Some).map_err(|e| match e {
                SanitizeError::Geometry { message } => SanitizeError::Geometry {
                    message: format!("feature {index}: {message}"),
                },
                other => other,
            }),
        })
        .collect()
}

/// Builds a copy of `feature` carrying `shape` as its geometry.
fn rebuild_feature(feature: &Value, shape: &Shape) -> Result<Value, SanitizeError> {
    let mut feature = feature.clone();
    let Some(object) = feature.as_object_mut() else {
        return Ok(feature);
    };

    let mut geometry = serde_json::to_value(geojson::Geometry::new(shape.to_geojson()))?;
    if let (Some(Value::Object(original)), Value::Object(fresh)) =
        (object.get("geometry"), &mut geometry)
    {
        for (key, value) in original {
            if !GEOMETRY_MEMBERS.contains(&key.as_str()) {
                fresh.insert(key.clone(), value.clone());
            }
        }
    }
    object.insert("geometry".to_string(), geometry);

    if object.contains_key("bbox") {
        match shape.bounds() {
            Some(bounds) => {
                object.insert("bbox".to_string(), serde_json::json!(bounds));
            }
            None => {
                object.shift_remove("bbox");
            }
        }
    }

    Ok(feature)
}

/// Copies `collection` with its feature list replaced.
fn with_features(collection: &Value, features: Vec<Value>) -> Value {
    let mut out = collection.clone();
    if let Some(object) = out.as_object_mut() {
        object.shift_remove("bbox");
        object.insert("features".to_string(), Value::Array(features));
    }
    out
}

/// A layer whose coordinates are normalized but whose rings are not yet
/// repaired.
#[derive(Debug, Clone)]
pub struct NormalizedCollection {
    /// One entry per input feature; `None` for a null geometry.
    pub shapes: Vec<Option<Shape>>,
    /// Coordinate counters only. Ring counters stay at zero.
    pub stats: SanitizationStats,
}

/// Normalizes every coordinate of a collection.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] or [`SanitizeError::Geometry`] if
/// the document is structurally invalid.
pub fn normalize_collection(
    collection: &Value,
    layer: &LayerDefinition,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<NormalizedCollection, SanitizeError> {
    let input = features(collection)?;
    let shapes = parse_shapes(input)?;

    progress.set_total(input.len() as u64 * 2);
    progress.set_message(format!("{}: normalizing", layer.name));

    let mut stats = SanitizationStats {
        features: input.len() as u64,
        ..SanitizationStats::default()
    };
    let shapes = shapes
        .iter()
        .map(|shape| {
            progress.inc(1);
            shape.as_ref().map(|shape| {
                let (shape, shape_stats) = normalize_shape(shape, config.latitude_policy);
                stats += shape_stats;
                shape
            })
        })
        .collect();

    Ok(NormalizedCollection { shapes, stats })
}

/// Repairs the rings of a normalized collection and rebuilds its features.
///
/// `collection` must be the document `normalized` was produced from.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] if `collection` is not a
/// `FeatureCollection` or does not match `normalized`.
pub fn repair_collection(
    collection: &Value,
    normalized: NormalizedCollection,
    layer: &LayerDefinition,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<SanitizedCollection, SanitizeError> {
    let input = features(collection)?;
    if input.len() != normalized.shapes.len() {
        return Err(SanitizeError::Collection {
            message: format!(
                "{} features but {} normalized geometries",
                input.len(),
                normalized.shapes.len()
            ),
        });
    }

    progress.set_message(format!("{}: repairing rings", layer.name));
    let mut stats = normalized.stats;
    let mut output = Vec::with_capacity(input.len());
    let mut emptied_features = Vec::new();
    let mut bounds = None;

    for (feature, shape) in input.iter().zip(normalized.shapes) {
        progress.inc(1);
        let Some(shape) = shape else {
            output.push(feature.clone());
            continue;
        };

        let (shape, ring_stats) = repair_shape(&shape, config.epsilon);
        stats += ring_stats;

        if shape.is_empty() {
            let id = feature_id(feature, &layer.id_properties);
            log::warn!(
                "{}: feature {id} has no valid coordinates left; keeping it with an empty {}",
                layer.name,
                shape.kind()
            );
            stats.empty_geometries += 1;
            emptied_features.push(id);
        }

        bounds = union_bounds(bounds, shape.bounds());
        output.push(rebuild_feature(feature, &shape)?);
    }

    Ok(SanitizedCollection {
        collection: with_features(collection, output),
        stats,
        emptied_features,
        bounds,
    })
}

/// Normalizes and repairs every feature of a collection.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] or [`SanitizeError::Geometry`] if
/// the document is structurally invalid.
pub fn sanitize_collection(
    collection: &Value,
    layer: &LayerDefinition,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<SanitizedCollection, SanitizeError> {
    let normalized = normalize_collection(collection, layer, config, progress)?;
    repair_collection(collection, normalized, layer, config, progress)
}

/// Runs the dateline pass over every feature of a collection.
///
/// # Errors
///
/// Returns [`SanitizeError::Collection`] or [`SanitizeError::Geometry`] if
/// the document is structurally invalid.
pub fn dateline_collection(
    collection: &Value,
    layer: &LayerDefinition,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<(Value, DatelineStats), SanitizeError> {
    let input = features(collection)?;
    let shapes = parse_shapes(input)?;

    progress.set_total(input.len() as u64);
    progress.set_message(format!("{}: checking dateline spans", layer.name));

    let mut stats = DatelineStats::default();
    let mut output = Vec::with_capacity(input.len());

    for (feature, shape) in input.iter().zip(&shapes) {
        progress.inc(1);
        let Some(shape) = shape else {
            stats.features += 1;
            output.push(feature.clone());
            continue;
        };

        let id = feature_id(feature, &layer.id_properties);
        let (shifted, feature_stats) = split_dateline(shape, &id, &config.dateline);
        let changed = feature_stats.polygons_shifted
            + feature_stats.polygons_reanchored
            + feature_stats.polygons_split
            > 0;
        stats += feature_stats;

        if changed {
            output.push(rebuild_feature(feature, &shifted)?);
        } else {
            output.push(feature.clone());
        }
    }

    Ok((with_features(collection, output), stats))
}

/// Sanitizes one layer from `input_dir` into `output_dir`.
///
/// Never fails: file-level errors are logged and recorded in the report.
#[must_use]
pub fn sanitize_layer(
    layer: &LayerDefinition,
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> LayerReport {
    let mut report = LayerReport::new(layer);
    let input = input_dir.join(layer.file_name());
    let output = output_dir.join(layer.file_name());

    match try_sanitize_layer(&mut report, layer, &input, &output, config, progress) {
        Ok(sanitized) => {
            let stats = sanitized.stats;
            progress.finish(format!(
                "{}: {} features, {} fixes",
                layer.name,
                stats.features,
                stats.total_fixes()
            ));
            log::info!(
                "{}: wrote {} ({} features, {} coordinates, {} fixes, bounds {:?})",
                layer.name,
                output.display(),
                stats.features,
                stats.coordinates,
                stats.total_fixes(),
                sanitized.bounds
            );
        }
        Err(e) => fail_layer(&mut report, layer, &e, progress),
    }

    report
}

/// Runs the dateline pass on one layer from `input_dir` into `output_dir`.
///
/// Never fails: file-level errors are logged and recorded in the report.
#[must_use]
pub fn dateline_layer(
    layer: &LayerDefinition,
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> LayerReport {
    let mut report = LayerReport::new(layer);
    let input = input_dir.join(layer.file_name());
    let output = output_dir.join(layer.file_name());

    match try_dateline_layer(&mut report, layer, &input, &output, config, progress) {
        Ok(()) => {
            let stats = report.dateline.as_ref();
            let shifted = stats.map_or(0, |s| {
                s.polygons_shifted + s.polygons_reanchored + s.polygons_split
            });
            let anomalies = stats.map_or(0, |s| s.anomalies.len());
            progress.finish(format!(
                "{}: {shifted} polygons moved, {anomalies} ambiguous",
                layer.name
            ));
            log::info!(
                "{}: wrote {} ({shifted} polygons moved, {anomalies} flagged for review)",
                layer.name,
                output.display()
            );
        }
        Err(e) => fail_layer(&mut report, layer, &e, progress),
    }

    report
}

fn try_sanitize_layer(
    report: &mut LayerReport,
    layer: &LayerDefinition,
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<SanitizedCollection, SanitizeError> {
    let collection = read_collection(input)?;
    report.stage = LayerStage::Loaded;

    let normalized = normalize_collection(&collection, layer, config, progress)?;
    report.stage = LayerStage::Normalized;
    log::debug!("{}: {}", layer.name, report.stage);

    let sanitized = repair_collection(&collection, normalized, layer, config, progress)?;
    report.stage = LayerStage::Repaired;
    log::debug!("{}: {}", layer.name, report.stage);
    report.sanitization = Some(sanitized.stats);
    report
        .emptied_features
        .clone_from(&sanitized.emptied_features);

    write_collection(output, &sanitized.collection)?;
    report.stage = LayerStage::Written;
    Ok(sanitized)
}

fn try_dateline_layer(
    report: &mut LayerReport,
    layer: &LayerDefinition,
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<(), SanitizeError> {
    let collection = read_collection(input)?;
    report.stage = LayerStage::Loaded;

    let (shifted, stats) = dateline_collection(&collection, layer, config, progress)?;
    report.stage = LayerStage::Shifted;
    report.dateline = Some(stats);

    write_collection(output, &shifted)?;
    report.stage = LayerStage::Written;
    Ok(())
}

fn fail_layer(
    report: &mut LayerReport,
    layer: &LayerDefinition,
    error: &SanitizeError,
    progress: &dyn ProgressCallback,
) {
    if layer.mandatory {
        log::error!("{}: skipped mandatory layer: {error}", layer.name);
    } else {
        log::error!("{}: skipped: {error}", layer.name);
    }
    progress.finish(format!("{}: failed", layer.name));
    report.error = Some(error.to_string());
}

/// Which pass a batch run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Sanitize,
    Dateline,
}

/// Runs a pass over every layer in order.
///
/// `make_progress` is called once per layer to obtain its progress sink.
#[must_use]
pub fn run(
    pass: Pass,
    layers: &[LayerDefinition],
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    make_progress: impl Fn(&LayerDefinition) -> Arc<dyn ProgressCallback>,
) -> RunReport {
    log::info!(
        "Processing {} layer(s) from {} into {}",
        layers.len(),
        input_dir.display(),
        output_dir.display()
    );

    let layers = layers
        .iter()
        .map(|layer| {
            let progress = make_progress(layer);
            match pass {
                Pass::Sanitize => {
                    sanitize_layer(layer, input_dir, output_dir, config, progress.as_ref())
                }
                Pass::Dateline => {
                    dateline_layer(layer, input_dir, output_dir, config, progress.as_ref())
                }
            }
        })
        .collect();

    RunReport { layers }
}
