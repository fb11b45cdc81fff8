//! Size-based pre-filtering and duplicate group types.
//!
//! # Overview
//!
//! Size filtering is the first elimination stage of duplicate detection:
//! two files of different byte length can never be duplicates, so any
//! candidate with a globally unique size is discarded before the expensive
//! hashing stage ever sees it. The filter is exact (no false negatives) and
//! costs one `stat` per candidate.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::filter_by_size;
//! use std::path::PathBuf;
//!
//! let candidates = vec![PathBuf::from("/a"), PathBuf::from("/b")];
//! let outcome = filter_by_size(candidates, None, None);
//! println!("{} candidates share a size", outcome.survivors.len());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, Hash, ScanError};

/// Statistics from the size-filter stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeFilterStats {
    /// Candidates that entered the filter
    pub input_files: usize,
    /// Candidates eliminated because their size was unique
    pub eliminated_unique: usize,
    /// Candidates that could not be stat'ed and were dropped
    pub failed_files: usize,
    /// Distinct sizes shared by two or more candidates
    pub shared_sizes: usize,
}

impl SizeFilterStats {
    /// Percentage of input eliminated by the filter.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Result of the size-filter stage.
#[derive(Debug, Default)]
pub struct SizeFilterOutcome {
    /// Candidates whose size is shared with at least one other candidate.
    ///
    /// Buckets are emitted in the order their size was first seen; within a
    /// bucket the candidate insertion order is preserved.
    pub survivors: Vec<PathBuf>,
    /// Statistics about the pass.
    pub stats: SizeFilterStats,
    /// Per-file stat failures (dropped from consideration, not fatal).
    pub errors: Vec<ScanError>,
    /// Whether the pass stopped early due to a shutdown request.
    pub interrupted: bool,
}

/// Keep only candidates that share their byte length with another candidate.
///
/// Single sequential pass: each path is stat'ed (metadata only, no content
/// read) and appended to the bucket for its length. Buckets with two or
/// more members are then flattened in bucket-encounter order. A file whose
/// size cannot be read is dropped and reported, never fatal.
#[must_use]
pub fn filter_by_size(
    candidates: Vec<PathBuf>,
    shutdown_flag: Option<&Arc<AtomicBool>>,
    progress_callback: Option<&Arc<dyn ProgressCallback>>,
) -> SizeFilterOutcome {
    let mut outcome = SizeFilterOutcome {
        stats: SizeFilterStats {
            input_files: candidates.len(),
            ..Default::default()
        },
        ..Default::default()
    };

    if let Some(callback) = progress_callback {
        callback.on_phase_start("size-filter", candidates.len());
    }

    let mut buckets: HashMap<u64, Vec<PathBuf>> = HashMap::new();
    // HashMap iteration order is arbitrary; remember first-seen size order.
    let mut size_order: Vec<u64> = Vec::new();

    for (idx, path) in candidates.into_iter().enumerate() {
        if shutdown_flag.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::debug!("Size filter: shutdown requested, stopping");
            outcome.interrupted = true;
            break;
        }

        if let Some(callback) = progress_callback {
            callback.on_progress(idx + 1, path.to_string_lossy().as_ref());
        }

        // symlink_metadata: candidates are regular files by construction,
        // and a path replaced by a symlink mid-run must not be followed.
        let size = match std::fs::symlink_metadata(&path) {
            Ok(m) => m.len(),
            Err(e) => {
                log::warn!("Dropping unreadable candidate {}: {}", path.display(), e);
                outcome.stats.failed_files += 1;
                outcome.errors.push(match e.kind() {
                    std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
                    _ => ScanError::Io {
                        path,
                        source: Arc::new(e),
                    },
                });
                continue;
            }
        };

        let bucket = buckets.entry(size).or_insert_with(|| {
            size_order.push(size);
            Vec::new()
        });
        bucket.push(path);
    }

    for size in size_order {
        if let Some(bucket) = buckets.get_mut(&size) {
            if bucket.len() >= 2 {
                outcome.stats.shared_sizes += 1;
                outcome.survivors.append(bucket);
            } else {
                outcome.stats.eliminated_unique += bucket.len();
            }
        }
    }

    if let Some(callback) = progress_callback {
        callback.on_phase_end("size-filter");
    }

    log::info!(
        "Size filter: {} -> {} candidates ({:.1}% eliminated, {} unreadable)",
        outcome.stats.input_files,
        outcome.survivors.len(),
        outcome.stats.elimination_rate(),
        outcome.stats.failed_files
    );

    outcome
}

/// Confirmed duplicate group: two or more paths with equal content digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 digest shared by every member
    pub hash: Hash,
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Member paths, sorted lexicographically; the first member is the
    /// representative kept when deletion runs
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a group; members are sorted by full path string (byte order)
    /// so the representative choice is deterministic regardless of parallel
    /// hashing arrival order.
    #[must_use]
    pub fn new(hash: Hash, size: u64, mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Self { hash, size, paths }
    }

    /// Number of member paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The member kept when deletion is enabled.
    #[must_use]
    pub fn representative(&self) -> Option<&PathBuf> {
        self.paths.first()
    }

    /// Members selected for deletion (everything but the representative).
    #[must_use]
    pub fn redundant(&self) -> &[PathBuf] {
        if self.paths.is_empty() {
            &[]
        } else {
            &self.paths[1..]
        }
    }

    /// Space reclaimable by deleting all redundant members.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.redundant().len() as u64
    }

    /// Digest as a hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path, content: &[u8]) -> PathBuf {
        File::create(path).unwrap().write_all(content).unwrap();
        path.to_path_buf()
    }

    #[test]
    fn test_unique_size_eliminated() {
        let dir = tempdir().unwrap();
        let a = touch(&dir.path().join("a"), b"12345");
        let b = touch(&dir.path().join("b"), b"abcde");
        let c = touch(&dir.path().join("c"), b"xyz");

        let outcome = filter_by_size(vec![a.clone(), b.clone(), c], None, None);

        assert_eq!(outcome.survivors, vec![a, b]);
        assert_eq!(outcome.stats.eliminated_unique, 1);
        assert_eq!(outcome.stats.shared_sizes, 1);
    }

    #[test]
    fn test_bucket_encounter_order_preserved() {
        let dir = tempdir().unwrap();
        // Sizes appear in the order 3, 5; survivors must keep that order.
        let a = touch(&dir.path().join("a"), b"111");
        let b = touch(&dir.path().join("b"), b"22222");
        let c = touch(&dir.path().join("c"), b"333");
        let d = touch(&dir.path().join("d"), b"44444");

        let outcome = filter_by_size(vec![a.clone(), b.clone(), c.clone(), d.clone()], None, None);

        assert_eq!(outcome.survivors, vec![a, c, b, d]);
    }

    #[test]
    fn test_empty_files_share_size_zero() {
        let dir = tempdir().unwrap();
        let a = touch(&dir.path().join("a"), b"");
        let b = touch(&dir.path().join("b"), b"");

        let outcome = filter_by_size(vec![a, b], None, None);
        assert_eq!(outcome.survivors.len(), 2);
    }

    #[test]
    fn test_unreadable_candidate_dropped() {
        let dir = tempdir().unwrap();
        let a = touch(&dir.path().join("a"), b"12345");
        let b = touch(&dir.path().join("b"), b"abcde");
        let gone = dir.path().join("gone");

        let outcome = filter_by_size(vec![a.clone(), gone, b.clone()], None, None);

        assert_eq!(outcome.survivors, vec![a, b]);
        assert_eq!(outcome.stats.failed_files, 1);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_representative_uses_full_path_string_order() {
        // '.' < '/' in string order, so "/x.y" must win over "/x/z" even
        // though component order would put "/x/z" first.
        let group = DuplicateGroup::new(
            [0u8; 32],
            4,
            vec![PathBuf::from("/x/z"), PathBuf::from("/x.y")],
        );
        assert_eq!(group.representative(), Some(&PathBuf::from("/x.y")));
    }

    #[test]
    fn test_group_sorted_and_representative() {
        let group = DuplicateGroup::new(
            [1u8; 32],
            10,
            vec![
                PathBuf::from("/z.txt"),
                PathBuf::from("/a.txt"),
                PathBuf::from("/m.txt"),
            ],
        );

        assert_eq!(group.representative(), Some(&PathBuf::from("/a.txt")));
        assert_eq!(
            group.redundant(),
            &[PathBuf::from("/m.txt"), PathBuf::from("/z.txt")]
        );
        assert_eq!(group.wasted_space(), 20);
    }
}
