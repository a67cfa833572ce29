#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` sanitization for the IxStats map layers.
//!
//! Prepares the political, climate, terrain, hydrography and background
//! layers for `PostGIS` import and vector-tile serving:
//!
//! - [`normalize`] wraps or clamps every coordinate into the target range
//!   and drops non-finite ones,
//! - [`ring`] removes zero-length edges and closes polygon rings,
//! - [`dateline`] moves polygons of antimeridian-crossing features onto one
//!   side of the dateline,
//! - [`pipeline`] runs those stages per layer, isolating file failures so
//!   one bad layer never aborts the batch.
//!
//! Every stage is a pure function returning its result together with the
//! counters describing what it changed.

pub mod config;
pub mod dateline;
pub mod geometry;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod report;
pub mod ring;
pub mod verify;

use std::path::PathBuf;

use thiserror::Error;

pub use ixstats_sanitize_models as models;

/// Errors that stop a single layer (or the loading of configuration).
///
/// Per-coordinate and per-ring problems are never errors; they are
/// corrected and counted.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The document is not a `GeoJSON` `FeatureCollection`.
    #[error("Invalid FeatureCollection: {message}")]
    Collection {
        /// Description of what went wrong.
        message: String,
    },

    /// A geometry's structure does not match its declared type.
    #[error("Invalid geometry: {message}")]
    Geometry {
        /// Description of what went wrong.
        message: String,
    },

    /// A requested layer is not in the registry.
    #[error("Unknown layer: {name}")]
    UnknownLayer {
        /// The requested name.
        name: String,
    },
}

impl SanitizeError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
