#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal output for `ixstats_sanitize`.
//!
//! One bar tracks layers, and each layer gets its own feature counter that
//! spins until the layer has been parsed. Log records go through the same
//! [`MultiProgress`] so warnings about a layer print above its bar.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ixstats_sanitize::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// Feature or layer counter drawn with `indicatif`.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied when the total becomes known.
    counting: ProgressStyle,
}

fn counter_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

impl IndicatifProgress {
    /// Bar for one layer. Shows `<layer>: reading` until the pipeline
    /// knows how many features there are.
    #[must_use]
    pub fn layer_bar(multi: &MultiProgress, layer: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("{layer}: reading"));

        Arc::new(Self {
            bar,
            counting: counter_style("  {msg:<32} [{bar:40.yellow/blue}] {pos}/{len} ({eta})"),
        })
    }

    /// Bar counting finished layers out of `total`.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let counting = counter_style("{msg:<16} [{bar:40.green}] {pos}/{len} layers {elapsed}");
        let bar = multi.add(ProgressBar::new(total).with_style(counting.clone()));
        bar.set_message(message.to_string());

        Arc::new(Self { bar, counting })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.counting.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` at `info` (or whatever `RUST_LOG` asks for)
/// and returns the [`MultiProgress`] every bar of the run belongs to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let logger = builder.build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    #[test]
    fn counter_takes_the_total_announced_by_the_pipeline() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let progress = IndicatifProgress {
            bar: multi.add(ProgressBar::new_spinner()),
            counting: counter_style("{msg} {pos}/{len}"),
        };

        progress.set_total(10);
        progress.inc(3);
        assert_eq!(progress.bar.length(), Some(10));
        assert_eq!(progress.bar.position(), 3);

        progress.finish("political: 10 features, 2 fixes".to_string());
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "political: 10 features, 2 fixes");
    }
}
