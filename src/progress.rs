//! Progress notifications for audit runs.
//!
//! The engine calls [`ProgressObserver::unit_done`] once per finished
//! identifier. Observers are purely observational and must not block.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives one notification per completed classification.
pub trait ProgressObserver: Send + Sync {
    /// One identifier finished.
    fn unit_done(&self);
}

/// Observer that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn unit_done(&self) {}
}

impl ProgressObserver for ProgressBar {
    fn unit_done(&self) {
        self.inc(1);
    }
}

/// Creates a terminal progress bar sized for `total` identifiers.
#[must_use]
pub fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] eta {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
