//! Progress reporting utilities using indicatif.
//!
//! The pipeline exposes, per stage, a monotonically increasing
//! items-processed signal through the [`ProgressCallback`] trait. The
//! [`Progress`] implementation renders it as terminal progress bars; it is
//! an observational side channel, never a correctness dependency.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for pipeline stages.
///
/// Implement this trait to receive progress updates during a run. Stage
/// names are `"enumerate"`, `"size-filter"`, `"hash"`, and `"delete"`.
pub trait ProgressCallback: Send + Sync {
    /// Called when a stage starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the stage
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Items processed so far (1-based, monotonically
    ///   increasing within a stage)
    /// * `item` - Path or root most recently processed
    fn on_progress(&self, current: usize, item: &str);

    /// Called when a stage completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress reporter.
///
/// One bar per stage; stages run strictly in sequence, so a single active
/// bar at a time is enough.
pub struct Progress {
    active: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars are displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            active: Mutex::new(None),
            quiet,
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:>12} [{bar:40}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix(phase.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let mut active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(old) = active.replace(bar) {
            old.finish_and_clear();
        }
    }

    fn on_progress(&self, current: usize, item: &str) {
        if self.quiet {
            return;
        }

        let active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(bar) = active.as_ref() {
            bar.set_position(current as u64);
            bar.set_message(item.to_string());
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if self.quiet {
            return;
        }

        let mut active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(bar) = active.take() {
            bar.finish_and_clear();
        }
    }
}
