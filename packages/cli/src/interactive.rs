//! Interactive menu for the sanitizer.
//!
//! Lets the user pick a pass, the layers and the settings with `dialoguer`
//! prompts instead of flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, MultiSelect, Select};
use ixstats_cli_utils::MultiProgress;
use ixstats_sanitize::pipeline::Pass;
use ixstats_sanitize::registry::all_layers;
use ixstats_sanitize::verify::VerifyOptions;
use ixstats_sanitize_models::{
    DatelineStrategy, Hemisphere, LatitudePolicy, LayerDefinition, PipelineConfig,
};

use crate::run::{self, PassRequest};

/// Top-level actions available in the menu.
enum Action {
    Sanitize,
    Dateline,
    Verify,
    ListLayers,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Sanitize,
        Self::Dateline,
        Self::Verify,
        Self::ListLayers,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Sanitize => "Sanitize coordinates and rings",
            Self::Dateline => "Repair dateline-crossing features",
            Self::Verify => "Verify written layers",
            Self::ListLayers => "List layers",
        }
    }
}

/// Runs the menu. Returns `false` when the chosen action left issues that
/// need manual review.
///
/// # Errors
///
/// Returns an error if a prompt fails or the JSON report cannot be
/// written.
pub fn run(multi: &MultiProgress) -> Result<bool, Box<dyn std::error::Error>> {
    println!("IxStats Map Layer Sanitizer");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Sanitize => {
            let Some(layers) = select_layers()? else {
                return Ok(true);
            };
            let input = prompt_path("Input directory", "geojson")?;
            let output = prompt_path("Output directory", "geojson_fixed")?;
            let config = PipelineConfig {
                latitude_policy: prompt_latitude_policy()?,
                ..PipelineConfig::default()
            };
            let request = PassRequest {
                pass: Pass::Sanitize,
                layers,
                input,
                output,
                config,
                report: prompt_report()?,
            };
            Ok(!run::execute_pass(multi, &request)?.has_critical_issues())
        }
        Action::Dateline => {
            let Some(layers) = select_layers()? else {
                return Ok(true);
            };
            let input = prompt_path("Input directory", "geojson_fixed")?;
            let output = prompt_path("Output directory", "geojson_split")?;

            let mut config = PipelineConfig::default();
            config.dateline.home = prompt_choice(
                "Home side of the dateline",
                &[Hemisphere::East, Hemisphere::West],
            )?;
            config.dateline.threshold = Input::new()
                .with_prompt("Home-side threshold longitude")
                .default(config.dateline.threshold)
                .interact_text()?;
            config.dateline.strategy = prompt_choice(
                "Polygons straddling the dateline",
                &[
                    DatelineStrategy::Uniform,
                    DatelineStrategy::Reanchor,
                    DatelineStrategy::Split,
                ],
            )?;

            let request = PassRequest {
                pass: Pass::Dateline,
                layers,
                input,
                output,
                config,
                report: prompt_report()?,
            };
            Ok(!run::execute_pass(multi, &request)?.has_critical_issues())
        }
        Action::Verify => {
            let Some(layers) = select_layers()? else {
                return Ok(true);
            };
            let dir = prompt_path("Directory to verify", "geojson_fixed")?;
            let allow_shifted = Confirm::new()
                .with_prompt("Is this dateline pass output (longitudes past ±180 allowed)?")
                .default(false)
                .interact()?;
            let options = VerifyOptions {
                latitude_policy: prompt_latitude_policy()?,
                max_abs_longitude: if allow_shifted { 360.0 } else { 180.0 },
                ..VerifyOptions::default()
            };
            Ok(run::execute_verify(&layers, &dir, &options))
        }
        Action::ListLayers => {
            run::list_layers();
            Ok(true)
        }
    }
}

/// Prompts for layers via checkboxes, all checked by default. `None` when
/// the user unchecks everything.
fn select_layers() -> Result<Option<Vec<LayerDefinition>>, Box<dyn std::error::Error>> {
    let layers = all_layers();
    let labels: Vec<String> = layers
        .iter()
        .map(|l| format!("{:<12} {}", l.name, l.description))
        .collect();
    let defaults = vec![true; layers.len()];

    let selected = MultiSelect::new()
        .with_prompt("Select layers (space=toggle, a=all, enter=confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    if selected.is_empty() {
        println!("No layers selected.");
        return Ok(None);
    }

    Ok(Some(
        selected.into_iter().map(|i| layers[i].clone()).collect(),
    ))
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}

fn prompt_latitude_policy() -> Result<LatitudePolicy, Box<dyn std::error::Error>> {
    prompt_choice(
        "Latitude range",
        &[LatitudePolicy::Mercator, LatitudePolicy::Geographic],
    )
}

fn prompt_choice<T: Copy + AsRef<str>>(
    prompt: &str,
    choices: &[T],
) -> Result<T, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = choices.iter().map(AsRef::as_ref).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[idx])
}

fn prompt_report() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("JSON report path (empty for none)")
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    Ok((!path.is_empty()).then(|| PathBuf::from(path)))
}
