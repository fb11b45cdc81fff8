//! Deletion of redundant duplicate-group members.
//!
//! # Safety
//!
//! The representative (first member after the group's lexicographic
//! ordering) is never touched; only redundant members are removed. A
//! per-file failure is recorded and the remaining files and groups are
//! still processed; the run never aborts on a deletion error.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::duplicates::DuplicateGroup;
use crate::progress::ProgressCallback;

/// Outcome of one attempted deletion.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Path the deletion was attempted on
    pub path: PathBuf,
    /// Size of the file in bytes (reclaimed if the deletion succeeded)
    pub size: u64,
    /// `None` on success, the failure message otherwise
    pub error: Option<String>,
}

impl DeleteOutcome {
    /// Whether the file was removed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Delete every redundant member of every group.
///
/// Groups are independent (their path sets are disjoint), so a failure in
/// one group never affects another. Within a group the representative is
/// skipped and each remaining member is removed with
/// [`std::fs::remove_file`]. The returned outcomes carry one entry per
/// attempted path, successes and failures alike.
#[must_use]
pub fn delete_redundant(
    groups: &[DuplicateGroup],
    shutdown_flag: Option<&Arc<AtomicBool>>,
    progress_callback: Option<&Arc<dyn ProgressCallback>>,
) -> Vec<DeleteOutcome> {
    let total: usize = groups.iter().map(|g| g.redundant().len()).sum();
    let mut outcomes = Vec::with_capacity(total);

    if let Some(callback) = progress_callback {
        callback.on_phase_start("delete", total);
    }

    for group in groups {
        for path in group.redundant() {
            if shutdown_flag.is_some_and(|f| f.load(Ordering::SeqCst)) {
                log::info!("Deletion: shutdown requested, stopping");
                if let Some(callback) = progress_callback {
                    callback.on_phase_end("delete");
                }
                return outcomes;
            }

            if let Some(callback) = progress_callback {
                callback.on_progress(outcomes.len() + 1, path.to_string_lossy().as_ref());
            }

            outcomes.push(delete_one(path, group.size));
        }
    }

    if let Some(callback) = progress_callback {
        callback.on_phase_end("delete");
    }

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    log::info!(
        "Deletion complete: {} removed, {} failed",
        outcomes.len() - failed,
        failed
    );

    outcomes
}

fn delete_one(path: &Path, size: u64) -> DeleteOutcome {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Deleted {}", path.display());
            DeleteOutcome {
                path: path.to_path_buf(),
                size,
                error: None,
            }
        }
        Err(e) => {
            log::warn!("Failed to delete {}: {}", path.display(), e);
            DeleteOutcome {
                path: path.to_path_buf(),
                size,
                error: Some(e.to_string()),
            }
        }
    }
}
