#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the IxStats map-layer sanitizer.
//!
//! Run with a subcommand for scripted use, or without one for an
//! interactive menu. Exits with status 1 when a run leaves something that
//! needs manual review: an ambiguous dateline polygon, a mandatory layer
//! that could not be processed, or `verify` violations.

mod interactive;
mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ixstats_sanitize::config::{ConfigOverrides, load_config};
use ixstats_sanitize::pipeline::Pass;
use ixstats_sanitize::registry::{parse_layer_list, resolve_layers};
use ixstats_sanitize::verify::VerifyOptions;
use ixstats_sanitize_models::{DatelineStrategy, Hemisphere, LatitudePolicy, LayerDefinition};

use crate::run::PassRequest;

#[derive(Parser)]
#[command(
    name = "ixstats_sanitize",
    about = "Coordinate sanitizer and dateline repair for IxStats GeoJSON layers"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every pass that reads and writes layers.
#[derive(Args)]
struct PassArgs {
    /// Directory containing `<layer>.geojson` inputs
    #[arg(long, default_value = "geojson")]
    input: PathBuf,
    /// Comma-separated list of layers to process (default: all registered layers)
    #[arg(long)]
    layers: Option<String>,
    /// TOML configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Latitude range to clamp into: `mercator` or `geographic`
    #[arg(long)]
    latitude_policy: Option<LatitudePolicy>,
    /// Distance under which two points count as the same point
    #[arg(long)]
    epsilon: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap/clamp coordinates, drop invalid values and repair rings
    Sanitize {
        #[command(flatten)]
        args: PassArgs,
        /// Output directory
        #[arg(long, default_value = "geojson_fixed")]
        output: PathBuf,
    },
    /// Move polygons of antimeridian-crossing features onto one side
    Dateline {
        #[command(flatten)]
        args: PassArgs,
        /// Output directory
        #[arg(long, default_value = "geojson_split")]
        output: PathBuf,
        /// Side of the dateline features are moved to: `east` or `west`
        #[arg(long)]
        home: Option<Hemisphere>,
        /// Longitude separating the home side from the far side
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<f64>,
        /// Added to each longitude before comparing against the threshold
        #[arg(long, allow_hyphen_values = true)]
        meridian_offset: Option<f64>,
        /// Treatment of polygons that straddle the dateline: `uniform`, `reanchor` or `split`
        #[arg(long)]
        strategy: Option<DatelineStrategy>,
    },
    /// Check written layers against the output guarantees
    Verify {
        /// Directory containing the layers to check
        #[arg(long, default_value = "geojson_fixed")]
        dir: PathBuf,
        /// Comma-separated list of layers to check (default: all registered layers)
        #[arg(long)]
        layers: Option<String>,
        /// Latitude range the layers were sanitized for
        #[arg(long, default_value = "mercator")]
        latitude_policy: LatitudePolicy,
        /// Accept longitudes up to ±360 (dateline pass output)
        #[arg(long)]
        allow_shifted: bool,
    },
    /// List all registered layers
    Layers,
}

fn selected_layers(
    layers: Option<&str>,
) -> Result<Vec<LayerDefinition>, Box<dyn std::error::Error>> {
    let names = layers.map(parse_layer_list).unwrap_or_default();
    Ok(resolve_layers(&names)?)
}

fn pass_request(
    pass: Pass,
    args: PassArgs,
    output: PathBuf,
    overrides: ConfigOverrides,
) -> Result<PassRequest, Box<dyn std::error::Error>> {
    let overrides = ConfigOverrides {
        latitude_policy: args.latitude_policy,
        epsilon: args.epsilon,
        ..overrides
    };
    let config = overrides.apply(load_config(args.config.as_deref())?);

    Ok(PassRequest {
        pass,
        layers: selected_layers(args.layers.as_deref())?,
        input: args.input,
        output,
        config,
        report: args.report,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = ixstats_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        if !interactive::run(&multi)? {
            std::process::exit(1);
        }
        return Ok(());
    };

    let ok = match command {
        Commands::Sanitize { args, output } => {
            let request =
                pass_request(Pass::Sanitize, args, output, ConfigOverrides::default())?;
            !run::execute_pass(&multi, &request)?.has_critical_issues()
        }
        Commands::Dateline {
            args,
            output,
            home,
            threshold,
            meridian_offset,
            strategy,
        } => {
            let overrides = ConfigOverrides {
                home,
                threshold,
                meridian_offset,
                strategy,
                ..ConfigOverrides::default()
            };
            let request = pass_request(Pass::Dateline, args, output, overrides)?;
            !run::execute_pass(&multi, &request)?.has_critical_issues()
        }
        Commands::Verify {
            dir,
            layers,
            latitude_policy,
            allow_shifted,
        } => {
            let options = VerifyOptions {
                latitude_policy,
                max_abs_longitude: if allow_shifted { 360.0 } else { 180.0 },
                ..VerifyOptions::default()
            };
            run::execute_verify(&selected_layers(layers.as_deref())?, &dir, &options)
        }
        Commands::Layers => {
            run::list_layers();
            true
        }
    };

    if !ok {
        log::error!("Run finished with issues that need manual review");
        std::process::exit(1);
    }

    Ok(())
}
