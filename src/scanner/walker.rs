//! Candidate enumeration from configured root patterns.
//!
//! # Overview
//!
//! This module provides the [`Enumerator`] struct for expanding an ordered
//! list of root path patterns into a deduplicated, deterministically ordered
//! list of candidate files.
//!
//! Each root may be a literal directory, a literal file, or a glob pattern
//! (`*`, `?`, `**`). Directories (literal or matched by a glob) are walked
//! recursively with `walkdir`; only regular files are emitted.
//!
//! # Ordering and deduplication
//!
//! Within each root, results are sorted lexicographically by full path
//! string. Roots are processed in configuration order and their sorted
//! expansions concatenated; there is no global re-sort, so the overall
//! ordering is fully deterministic for a fixed configuration and a fixed
//! filesystem state. A path already emitted by an earlier root (or earlier
//! within the same root) is not re-emitted.
//!
//! # Symlink policy
//!
//! Symbolic links are never followed: both symlinked directories and
//! symlinked files are skipped. This keeps the candidate set free of
//! aliased paths that would otherwise "duplicate" themselves.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::progress::ProgressCallback;

use super::ScanError;

/// Result of an enumeration pass.
#[derive(Debug, Default)]
pub struct EnumerateOutcome {
    /// Candidate files in deterministic order (sorted per root,
    /// concatenated in root-configuration order).
    pub candidates: Vec<PathBuf>,
    /// Root-level and path-level problems that were skipped over.
    pub errors: Vec<ScanError>,
    /// Whether enumeration stopped early due to a shutdown request.
    pub interrupted: bool,
}

/// Expands configured root patterns into a candidate file list.
pub struct Enumerator {
    roots: Vec<String>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Enumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("roots", &self.roots)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Enumerator {
    /// Create a new enumerator over the given root patterns.
    #[must_use]
    pub fn new(roots: &[String]) -> Self {
        Self {
            roots: roots.to_vec(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Expand all roots into a deduplicated, ordered candidate list.
    ///
    /// Root-level failures (missing root, invalid pattern, unreadable
    /// directory) are collected as [`ScanError`]s and skipped; they never
    /// abort the pass.
    #[must_use]
    pub fn enumerate(&self) -> EnumerateOutcome {
        let mut outcome = EnumerateOutcome::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("enumerate", self.roots.len());
        }

        for (idx, root) in self.roots.iter().enumerate() {
            if self.is_shutdown_requested() {
                log::debug!("Enumerator: shutdown requested, stopping at root {}", root);
                outcome.interrupted = true;
                break;
            }

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(idx + 1, root);
            }

            let mut batch = Vec::new();
            self.expand_root(root, &mut seen, &mut batch, &mut outcome.errors);

            // Per-root lexicographic order over the full path string (byte
            // order, not component order); root order itself is preserved.
            batch.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
            log::debug!("Root '{}' contributed {} candidates", root, batch.len());
            outcome.candidates.extend(batch);
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("enumerate");
        }

        log::info!(
            "Enumeration complete: {} candidates from {} roots ({} skipped entries)",
            outcome.candidates.len(),
            self.roots.len(),
            outcome.errors.len()
        );

        outcome
    }

    /// Expand a single root pattern, appending new candidates to `batch`.
    fn expand_root(
        &self,
        root: &str,
        seen: &mut HashSet<PathBuf>,
        batch: &mut Vec<PathBuf>,
        errors: &mut Vec<ScanError>,
    ) {
        let matches = match glob::glob(root) {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("Invalid root pattern '{}': {}", root, e.msg);
                errors.push(ScanError::InvalidPattern {
                    pattern: root.to_string(),
                    message: e.msg.to_string(),
                });
                return;
            }
        };

        let mut matched_any = false;
        for entry in matches {
            if self.is_shutdown_requested() {
                return;
            }

            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skipping unreadable match under '{}': {}", root, e);
                    errors.push(ScanError::Io {
                        path: e.path().to_path_buf(),
                        source: Arc::new(e.into_error()),
                    });
                    continue;
                }
            };
            matched_any = true;

            // Never follow symlinks, whether they point at files or
            // directories. symlink_metadata does not traverse the link.
            let meta = match std::fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    errors.push(io_scan_error(&path, e));
                    continue;
                }
            };

            if meta.file_type().is_symlink() {
                log::trace!("Skipping symlink: {}", path.display());
            } else if meta.is_dir() {
                self.walk_directory(&path, seen, batch, errors);
            } else if meta.is_file() {
                self.push_candidate(path, seen, batch, errors);
            }
        }

        if !matched_any {
            log::warn!("Root not found, skipping: {}", root);
            errors.push(ScanError::RootNotFound(root.to_string()));
        }
    }

    /// Recursively collect regular files under a directory root.
    fn walk_directory(
        &self,
        dir: &Path,
        seen: &mut HashSet<PathBuf>,
        batch: &mut Vec<PathBuf>,
        errors: &mut Vec<ScanError>,
    ) {
        for entry in WalkDir::new(dir).follow_links(false) {
            if self.is_shutdown_requested() {
                return;
            }

            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() {
                        self.push_candidate(entry.into_path(), seen, batch, errors);
                    } else if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                    log::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    match e.into_io_error() {
                        Some(io) => errors.push(io_scan_error(&path, io)),
                        None => errors.push(ScanError::Io {
                            path: path.clone(),
                            source: Arc::new(std::io::Error::other("walk loop detected")),
                        }),
                    }
                }
            }
        }
    }

    /// Absolutize and deduplicate a candidate before recording it.
    fn push_candidate(
        &self,
        path: PathBuf,
        seen: &mut HashSet<PathBuf>,
        batch: &mut Vec<PathBuf>,
        errors: &mut Vec<ScanError>,
    ) {
        let absolute = match std::path::absolute(&path) {
            Ok(p) => p,
            Err(e) => {
                errors.push(io_scan_error(&path, e));
                return;
            }
        };

        if seen.insert(absolute.clone()) {
            batch.push(absolute);
        } else {
            log::trace!("Duplicate path suppressed: {}", absolute.display());
        }
    }
}

fn io_scan_error(path: &Path, e: std::io::Error) -> ScanError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
        _ => ScanError::Io {
            path: path.to_path_buf(),
            source: Arc::new(e),
        },
    }
}
