//! Progress hooks for the sanitizer passes.
//!
//! The library only counts features; how the count is shown is up to the
//! caller. The CLI draws `indicatif` bars, tests pass [`NullProgress`].

use std::sync::Arc;

/// Sink for the feature counts of one layer.
///
/// A pass calls [`set_total`](Self::set_total) once the layer is parsed,
/// [`inc`](Self::inc) per feature and stage, and
/// [`finish`](Self::finish) with a one-line outcome.
pub trait ProgressCallback: Send + Sync {
    fn set_total(&self, total: u64);

    fn inc(&self, delta: u64);

    /// Names the stage currently running, e.g. `political: repairing rings`.
    fn set_message(&self, msg: String);

    fn finish(&self, msg: String);
}

/// Discards everything.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// [`NullProgress`] behind the `Arc` that [`crate::pipeline::run`] expects.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
