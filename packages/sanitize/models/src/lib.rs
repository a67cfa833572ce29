#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map-layer sanitizer configuration, statistics, and report types.
//!
//! These types are shared between the sanitizer library and the CLI. They
//! carry no behavior beyond small helpers: the transformations themselves
//! live in `ixstats_sanitize`.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Largest latitude representable in Web Mercator (EPSG:3857).
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_78;

/// Largest geographic latitude.
pub const GEOGRAPHIC_MAX_LATITUDE: f64 = 90.0;

/// Default tolerance for treating two coordinates as the same point.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// A `[longitude, latitude]` pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Whether both components are within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.lng - other.lng).abs() <= epsilon && (self.lat - other.lat).abs() <= epsilon
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

/// Which latitude range the output must fit in.
///
/// Chosen per run, depending on the projection of the downstream renderer.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LatitudePolicy {
    /// `±85.05112878`, required by Web Mercator tiling.
    #[default]
    Mercator,
    /// `±90`, for projections with full polar coverage (Equal Earth,
    /// Natural Earth).
    Geographic,
}

impl LatitudePolicy {
    /// Returns the inclusive `(min, max)` latitude range for this policy.
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Mercator => (-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE),
            Self::Geographic => (-GEOGRAPHIC_MAX_LATITUDE, GEOGRAPHIC_MAX_LATITUDE),
        }
    }
}

/// What happened to a longitude during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongitudeFix {
    /// Already within `[-180, 180]`.
    Unchanged,
    /// Brought into range by adding or subtracting 360.
    Wrapped,
    /// Too far out of range to wrap; clamped to `±180`.
    Clamped,
}

/// The side of the antimeridian a dateline-crossing landmass is expressed on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Hemisphere {
    /// Far-side polygons move by `+360` and end up beyond `+180`.
    #[default]
    East,
    /// Far-side polygons move by `-360` and end up beyond `-180`.
    West,
}

impl Hemisphere {
    /// The constant translation applied to a polygon lying on the far side.
    #[must_use]
    pub const fn shift(self) -> f64 {
        match self {
            Self::East => 360.0,
            Self::West => -360.0,
        }
    }
}

/// How to treat a single polygon whose own vertices straddle the dateline.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DatelineStrategy {
    /// Only whole-polygon translations are applied. Straddling polygons are
    /// left alone and flagged for manual review.
    #[default]
    Uniform,
    /// Straddling polygons are re-expressed in the single 360° window that
    /// starts at the threshold on the home side, if that brings their span
    /// to 180° or less.
    Reanchor,
    /// Straddling polygons are cut at ±180° into parts that stay inside
    /// the valid longitude range, with interpolated crossing vertices.
    /// Whole polygons are never translated.
    Split,
}

/// Settings for the dateline pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatelineConfig {
    /// Side the landmass is expressed on after shifting.
    pub home: Hemisphere,
    /// Longitude separating home-side from far-side vertices.
    ///
    /// With `home = east` a vertex is on the far side when its (offset)
    /// longitude is below the threshold; with `home = west`, above it.
    pub threshold: f64,
    /// Added to every longitude before the home/far side test, for datasets
    /// authored against a shifted prime meridian. Never written to output.
    pub meridian_offset: f64,
    /// Treatment of polygons that straddle the dateline themselves.
    pub strategy: DatelineStrategy,
}

impl Default for DatelineConfig {
    fn default() -> Self {
        Self {
            home: Hemisphere::East,
            threshold: 0.0,
            meridian_offset: 0.0,
            strategy: DatelineStrategy::Uniform,
        }
    }
}

/// Pipeline-wide settings, threaded explicitly into every stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Latitude range for the output.
    pub latitude_policy: LatitudePolicy,
    /// Tolerance for duplicate-point and ring-closure checks.
    pub epsilon: f64,
    /// Dateline pass settings.
    pub dateline: DatelineConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            latitude_policy: LatitudePolicy::default(),
            epsilon: DEFAULT_EPSILON,
            dateline: DatelineConfig::default(),
        }
    }
}

/// Counters describing what the sanitizer changed in a layer.
///
/// Purely informational. Stages return their own counts and callers merge
/// them with `+=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizationStats {
    pub features: u64,
    pub coordinates: u64,
    pub longitudes_wrapped: u64,
    pub longitudes_clamped: u64,
    pub latitudes_clamped: u64,
    pub invalid_removed: u64,
    pub rings_closed: u64,
    pub duplicates_removed: u64,
    /// Features whose geometry ended up with no coordinates at all.
    pub empty_geometries: u64,
}

impl SanitizationStats {
    /// Total number of corrections of any kind.
    #[must_use]
    pub const fn total_fixes(&self) -> u64 {
        self.longitudes_wrapped
            + self.longitudes_clamped
            + self.latitudes_clamped
            + self.invalid_removed
            + self.rings_closed
            + self.duplicates_removed
    }
}

impl AddAssign for SanitizationStats {
    fn add_assign(&mut self, rhs: Self) {
        self.features += rhs.features;
        self.coordinates += rhs.coordinates;
        self.longitudes_wrapped += rhs.longitudes_wrapped;
        self.longitudes_clamped += rhs.longitudes_clamped;
        self.latitudes_clamped += rhs.latitudes_clamped;
        self.invalid_removed += rhs.invalid_removed;
        self.rings_closed += rhs.rings_closed;
        self.duplicates_removed += rhs.duplicates_removed;
        self.empty_geometries += rhs.empty_geometries;
    }
}

/// A polygon the dateline pass refused to move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatelineAnomaly {
    /// Identifier of the owning feature.
    pub feature_id: String,
    /// Index of the polygon within its `MultiPolygon` (0 for a `Polygon`).
    /// `None` when the whole feature was left as it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_index: Option<usize>,
    /// Smallest raw longitude of the polygon (or feature).
    pub min_lng: f64,
    /// Largest raw longitude of the polygon (or feature).
    pub max_lng: f64,
}

/// Counters and anomalies produced by the dateline pass over one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatelineStats {
    pub features: u64,
    /// Features whose combined longitude span exceeded 180°.
    pub wide_features: u64,
    pub polygons_shifted: u64,
    pub polygons_reanchored: u64,
    /// Polygons with at least one edge jumping more than 180° in longitude.
    pub crossing_polygons: u64,
    /// Straddling polygons cut into parts at ±180°.
    #[serde(default)]
    pub polygons_split: u64,
    pub anomalies: Vec<DatelineAnomaly>,
}

impl AddAssign for DatelineStats {
    fn add_assign(&mut self, rhs: Self) {
        self.features += rhs.features;
        self.wide_features += rhs.wide_features;
        self.polygons_shifted += rhs.polygons_shifted;
        self.polygons_reanchored += rhs.polygons_reanchored;
        self.crossing_polygons += rhs.crossing_polygons;
        self.polygons_split += rhs.polygons_split;
        self.anomalies.extend(rhs.anomalies);
    }
}

/// A named map layer known to the sanitizer, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDefinition {
    /// Layer name, also the file stem (`political` → `political.geojson`).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// A file-level failure on a mandatory layer fails the run.
    #[serde(default)]
    pub mandatory: bool,
    /// Property names consulted, in order, when a feature has no `id`.
    #[serde(default = "default_id_properties")]
    pub id_properties: Vec<String>,
}

fn default_id_properties() -> Vec<String> {
    vec!["id".to_string(), "name".to_string()]
}

impl LayerDefinition {
    /// File name of this layer inside an input or output directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.geojson", self.name)
    }
}

/// How far a layer got through the pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayerStage {
    Pending,
    Loaded,
    Normalized,
    Repaired,
    Shifted,
    Written,
}

/// Result of running one layer through a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerReport {
    pub layer: String,
    pub mandatory: bool,
    /// Last stage reached. Anything short of `Written` means the layer
    /// produced no output.
    pub stage: LayerStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitization: Option<SanitizationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dateline: Option<DatelineStats>,
    /// Ids of features left with an empty geometry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emptied_features: Vec<String>,
    /// File-level error that stopped this layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayerReport {
    #[must_use]
    pub fn new(definition: &LayerDefinition) -> Self {
        Self {
            layer: definition.name.clone(),
            mandatory: definition.mandatory,
            stage: LayerStage::Pending,
            sanitization: None,
            dateline: None,
            emptied_features: Vec::new(),
            error: None,
        }
    }

    /// Whether this layer left something that needs a human.
    #[must_use]
    pub fn has_critical_issues(&self) -> bool {
        let failed_mandatory = self.mandatory && self.error.is_some();
        let ambiguous = self
            .dateline
            .as_ref()
            .is_some_and(|stats| !stats.anomalies.is_empty());
        failed_mandatory || ambiguous
    }
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub layers: Vec<LayerReport>,
}

impl RunReport {
    /// Whether any layer left uncorrectable issues behind.
    #[must_use]
    pub fn has_critical_issues(&self) -> bool {
        self.layers.iter().any(LayerReport::has_critical_issues)
    }

    /// Sanitization counters summed over all layers.
    #[must_use]
    pub fn total_sanitization(&self) -> SanitizationStats {
        let mut total = SanitizationStats::default();
        for stats in self.layers.iter().filter_map(|l| l.sanitization) {
            total += stats;
        }
        total
    }

    /// Dateline counters summed over all layers.
    #[must_use]
    pub fn total_dateline(&self) -> DatelineStats {
        let mut total = DatelineStats::default();
        for stats in self.layers.iter().filter_map(|l| l.dateline.clone()) {
            total += stats;
        }
        total
    }
}
