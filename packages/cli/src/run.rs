//! Command bodies shared by the flag-driven and interactive front ends.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ixstats_cli_utils::{IndicatifProgress, MultiProgress};
use ixstats_sanitize::pipeline::{self, Pass};
use ixstats_sanitize::registry::all_layers;
use ixstats_sanitize::report::{log_summary, summary_lines, write_json_report};
use ixstats_sanitize::verify::{VerifyOptions, verify_layer};
use ixstats_sanitize_models::{LayerDefinition, PipelineConfig, RunReport};

/// Violations printed per layer before the rest are summarized.
const MAX_LISTED_VIOLATIONS: usize = 20;

/// A fully resolved sanitize or dateline run.
pub struct PassRequest {
    pub pass: Pass,
    pub layers: Vec<LayerDefinition>,
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: PipelineConfig,
    pub report: Option<PathBuf>,
}

/// Runs a pass with progress bars, prints the summary and writes the
/// optional JSON report.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be written. Layer failures
/// are recorded in the returned report, not returned as errors.
pub fn execute_pass(
    multi: &MultiProgress,
    request: &PassRequest,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let label = match request.pass {
        Pass::Sanitize => "Sanitizing",
        Pass::Dateline => "Dateline pass",
    };
    let steps = IndicatifProgress::steps_bar(multi, label, request.layers.len() as u64);

    let report = pipeline::run(
        request.pass,
        &request.layers,
        &request.input,
        &request.output,
        &request.config,
        |layer| {
            steps.inc(1);
            IndicatifProgress::layer_bar(multi, &layer.name)
        },
    );
    steps.finish(format!("{label}: done"));

    println!();
    for line in summary_lines(&report) {
        println!("{line}");
    }
    log_summary(&report);

    if let Some(path) = &request.report {
        write_json_report(path, &report)?;
    }

    log::info!("Finished in {:.1}s", start.elapsed().as_secs_f64());
    Ok(report)
}

/// Verifies already-written layers. Returns `true` when every readable
/// layer is clean and no mandatory layer was unreadable.
#[must_use]
pub fn execute_verify(layers: &[LayerDefinition], dir: &Path, options: &VerifyOptions) -> bool {
    let mut clean = true;

    for layer in layers {
        match verify_layer(layer, dir, options) {
            Ok(violations) if violations.is_empty() => {
                log::info!("{}: OK", layer.name);
            }
            Ok(violations) => {
                clean = false;
                log::warn!("{}: {} violation(s)", layer.name, violations.len());
                for violation in violations.iter().take(MAX_LISTED_VIOLATIONS) {
                    println!("  {}: {violation}", layer.name);
                }
                if violations.len() > MAX_LISTED_VIOLATIONS {
                    println!(
                        "  {}: ... and {} more",
                        layer.name,
                        violations.len() - MAX_LISTED_VIOLATIONS
                    );
                }
            }
            Err(e) => {
                log::error!("{}: {e}", layer.name);
                if layer.mandatory {
                    clean = false;
                }
            }
        }
    }

    clean
}

/// Prints the layer registry.
pub fn list_layers() {
    let layers = all_layers();
    println!("{:<12} {:<10} DESCRIPTION", "LAYER", "MANDATORY");
    println!("{}", "-".repeat(70));
    for layer in &layers {
        println!(
            "{:<12} {:<10} {}",
            layer.name,
            if layer.mandatory { "yes" } else { "no" },
            layer.description
        );
    }
    println!("\n{} layer(s)", layers.len());
}
