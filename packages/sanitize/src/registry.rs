//! Compile-time registry of the map layers the sanitizer knows about.
//!
//! Layers are declared in `layers/layers.toml` and embedded with
//! `include_str!`. Adding a layer means adding a `[[layer]]` table there.

use ixstats_sanitize_models::LayerDefinition;
use serde::Deserialize;

use crate::SanitizeError;

/// Number of registered layers. Enforced by a test.
#[cfg(test)]
const EXPECTED_LAYER_COUNT: usize = 7;

const LAYERS_TOML: &str = include_str!("../layers/layers.toml");

#[derive(Deserialize)]
struct LayerFile {
    layer: Vec<LayerDefinition>,
}

/// Returns every registered layer in processing order.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a parse failure is a development error caught by tests.
#[must_use]
pub fn all_layers() -> Vec<LayerDefinition> {
    toml::de::from_str::<LayerFile>(LAYERS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded layer registry: {e}"))
        .layer
}

/// Resolves a list of layer names against the registry.
///
/// An empty list selects every layer. Order follows the request.
///
/// # Errors
///
/// Returns [`SanitizeError::UnknownLayer`] for the first name that is not
/// registered.
pub fn resolve_layers(names: &[String]) -> Result<Vec<LayerDefinition>, SanitizeError> {
    let layers = all_layers();
    if names.is_empty() {
        return Ok(layers);
    }

    names
        .iter()
        .map(|name| {
            layers
                .iter()
                .find(|layer| layer.name.eq_ignore_ascii_case(name.trim()))
                .cloned()
                .ok_or_else(|| SanitizeError::UnknownLayer {
                    name: name.trim().to_string(),
                })
        })
        .collect()
}

/// Splits a comma-separated layer list, as accepted by `--layers`.
#[must_use]
pub fn parse_layer_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
