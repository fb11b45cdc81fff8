//! Duplicate detection engine.
//!
//! # Overview
//!
//! This module orchestrates the full pipeline:
//! 1. **Enumeration**: expand configured roots into an ordered candidate list
//! 2. **Size filter**: drop candidates whose byte length is unique
//! 3. **Hash + group**: resolve each survivor's content digest (cache hit,
//!    or stream-hash and cache) and bucket paths by digest
//! 4. **Deletion** (optional): remove every non-representative member of
//!    each duplicate group
//!
//! Hashing is the only parallel stage, running on a bounded rayon pool so a
//! spinning disk is not thrashed by dozens of concurrent readers.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::cache::HashCache;
//! use dupescan::duplicates::{DuplicateEngine, EngineConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(HashCache::open(Path::new("cache.db")).unwrap());
//! let config = EngineConfig::new(vec!["/data/photos".to_string()], cache);
//! let engine = DuplicateEngine::new(config);
//!
//! let report = engine.run(false).unwrap();
//! println!("{} duplicate groups", report.groups.len());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::actions::delete::{delete_redundant, DeleteOutcome};
use crate::cache::{FileRecord, HashCache};
use crate::progress::ProgressCallback;
use crate::scanner::{Enumerator, Hash, HashError, Hasher, ScanError};

use super::groups::{filter_by_size, DuplicateGroup, SizeFilterStats};

/// Configuration for the duplicate engine.
#[derive(Clone)]
pub struct EngineConfig {
    /// Ordered root path patterns from the configuration file.
    pub roots: Vec<String>,
    /// Persistent hash cache; required, there is no in-memory mode.
    pub cache: Arc<HashCache>,
    /// Number of I/O threads for parallel hashing.
    /// Default is 2 to avoid disk thrashing on spinning media.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("roots", &self.roots)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

/// Default hashing parallelism.
pub const DEFAULT_IO_THREADS: usize = 2;

impl EngineConfig {
    /// Create a configuration for the given roots and cache.
    #[must_use]
    pub fn new(roots: Vec<String>, cache: Arc<HashCache>) -> Self {
        Self {
            roots,
            cache,
            io_threads: DEFAULT_IO_THREADS,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the I/O thread count for the hashing stage.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
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
}

/// Errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The run was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Run interrupted by user")]
    Interrupted,

    /// The hashing thread pool could not be built.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Statistics from the hashing stage.
#[derive(Debug, Clone, Default)]
pub struct HashStats {
    /// Survivors that entered the hashing stage
    pub input_files: usize,
    /// Digests resolved from a current cache record (no bytes read)
    pub cache_hits: usize,
    /// Digests computed by reading file bytes
    pub cache_misses: usize,
    /// Files skipped because they could not be opened or read
    pub failed_files: usize,
    /// Total bytes streamed through the hasher
    pub bytes_hashed: u64,
}

/// Report from a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Candidates produced by enumeration
    pub found: usize,
    /// Candidates that survived the size filter
    pub filtered: usize,
    /// Confirmed duplicate groups (2+ members each), ordered by
    /// representative path
    pub groups: Vec<DuplicateGroup>,
    /// Statistics from the size-filter stage
    pub size_stats: SizeFilterStats,
    /// Statistics from the hashing stage
    pub hash_stats: HashStats,
    /// Root- and file-level problems that were skipped over
    pub scan_errors: Vec<ScanError>,
    /// Hashing failures (files absent from all groups this run)
    pub hash_errors: Vec<HashError>,
    /// Per-file deletion outcomes (empty on a dry run with no groups)
    pub deletions: Vec<DeleteOutcome>,
    /// Whether deletion was enabled for this run
    pub delete_enabled: bool,
    /// Wall-clock duration of the run
    pub duration: std::time::Duration,
}

impl RunReport {
    /// Total space reclaimable by removing all redundant members.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }

    /// Count of redundant files across all groups.
    #[must_use]
    pub fn redundant_files(&self) -> usize {
        self.groups.iter().map(|g| g.redundant().len()).sum()
    }

    /// Whether any per-file or per-root problem was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty()
            || !self.hash_errors.is_empty()
            || self.deletions.iter().any(|d| d.error.is_some())
    }
}

/// Outcome of hashing one candidate on the worker pool.
enum HashTask {
    Resolved {
        path: PathBuf,
        size: u64,
        hash: Hash,
        cache_hit: bool,
    },
    Failed(HashError),
    Interrupted,
}

/// Orchestrates enumeration, size filtering, hashing, grouping, and
/// optional deletion.
pub struct DuplicateEngine {
    config: EngineConfig,
    hasher: Arc<Hasher>,
}

impl DuplicateEngine {
    /// Create a new engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self {
            config,
            hasher: Arc::new(hasher),
        }
    }

    /// Run the full pipeline.
    ///
    /// With `delete_enabled` false this is a pure dry run: no filesystem
    /// mutation occurs and the report is informational. With it true, every
    /// redundant member of each group is removed; per-file deletion
    /// failures are recorded in the report and do not abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Interrupted`] if a shutdown was requested at
    /// any stage boundary, and [`EngineError::ThreadPool`] if the hashing
    /// pool cannot be built. Per-root and per-file problems never abort
    /// the run; they are collected in the report.
    pub fn run(&self, delete_enabled: bool) -> Result<RunReport, EngineError> {
        let start = std::time::Instant::now();
        let mut report = RunReport {
            delete_enabled,
            ..Default::default()
        };

        log::info!(
            "Starting duplicate scan of {} root(s), delete {}",
            self.config.roots.len(),
            if delete_enabled { "enabled" } else { "disabled" }
        );

        // Stage 1: enumeration
        let mut enumerator = Enumerator::new(&self.config.roots);
        if let Some(ref flag) = self.config.shutdown_flag {
            enumerator = enumerator.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            enumerator = enumerator.with_progress_callback(callback.clone());
        }

        let enumerated = enumerator.enumerate();
        report.found = enumerated.candidates.len();
        report.scan_errors.extend(enumerated.errors);
        if enumerated.interrupted || self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        // Stage 2: size filter
        let filtered = filter_by_size(
            enumerated.candidates,
            self.config.shutdown_flag.as_ref(),
            self.config.progress_callback.as_ref(),
        );
        report.filtered = filtered.survivors.len();
        report.size_stats = filtered.stats;
        report.scan_errors.extend(filtered.errors);
        if filtered.interrupted || self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        // Stage 3: hash and group
        let groups = self.hash_and_group(filtered.survivors, &mut report)?;
        report.groups = groups;
        if self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        // Stage 4: deletion (or dry-run reporting only)
        if delete_enabled {
            report.deletions = delete_redundant(
                &report.groups,
                self.config.shutdown_flag.as_ref(),
                self.config.progress_callback.as_ref(),
            );
            if self.config.is_shutdown_requested() {
                return Err(EngineError::Interrupted);
            }
        }

        report.duration = start.elapsed();
        log::info!(
            "Run complete: {} found, {} size-filtered, {} groups, {} cache hits, {:?}",
            report.found,
            report.filtered,
            report.groups.len(),
            report.hash_stats.cache_hits,
            report.duration
        );

        Ok(report)
    }

    /// Resolve digests for all survivors and bucket paths by digest.
    ///
    /// Workers check the cache first; a record whose stored mtime matches
    /// the file's current mtime yields the digest without reading bytes.
    /// Otherwise the file is streamed through SHA-256 and the fresh record
    /// upserted (hash first, upsert after, so an interrupted hash never
    /// leaves a half-written record). Grouping itself happens sequentially
    /// over the collected worker results, so group membership needs no
    /// concurrent map.
    fn hash_and_group(
        &self,
        survivors: Vec<PathBuf>,
        report: &mut RunReport,
    ) -> Result<Vec<DuplicateGroup>, EngineError> {
        report.hash_stats.input_files = survivors.len();

        if survivors.is_empty() {
            log::debug!("Hashing: no survivors to process");
            return Ok(Vec::new());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hash", survivors.len());
        }

        log::info!(
            "Hashing {} candidates on {} thread(s)",
            survivors.len(),
            self.config.io_threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()?;

        let completed = Mutex::new(0usize);
        let results: Vec<HashTask> = pool.install(|| {
            survivors
                .into_par_iter()
                .map(|path| self.resolve_one(&completed, path))
                .collect()
        });

        let mut interrupted = self.config.is_shutdown_requested();
        let mut buckets: HashMap<Hash, (u64, Vec<PathBuf>)> = HashMap::new();

        for task in results {
            match task {
                HashTask::Resolved {
                    path,
                    size,
                    hash,
                    cache_hit,
                } => {
                    if cache_hit {
                        report.hash_stats.cache_hits += 1;
                    } else {
                        report.hash_stats.cache_misses += 1;
                        report.hash_stats.bytes_hashed += size;
                    }
                    buckets.entry(hash).or_insert_with(|| (size, Vec::new())).1.push(path);
                }
                HashTask::Failed(e) => {
                    report.hash_stats.failed_files += 1;
                    report.hash_errors.push(e);
                }
                HashTask::Interrupted => interrupted = true,
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hash");
        }

        if interrupted {
            return Err(EngineError::Interrupted);
        }

        // Buckets with a single member are real files with no duplicate
        // among the size-filtered candidates.
        let mut groups: Vec<DuplicateGroup> = buckets
            .into_iter()
            .filter(|(_, (_, paths))| paths.len() >= 2)
            .map(|(hash, (size, paths))| DuplicateGroup::new(hash, size, paths))
            .collect();

        // Deterministic output order across runs. Representatives are unique
        // (each path lands in at most one group), so the first member alone
        // orders the list; byte order matches the member ordering itself.
        groups.sort_by(|a, b| a.paths[0].as_os_str().cmp(b.paths[0].as_os_str()));

        for group in &groups {
            log::debug!(
                "Group {}: {} member(s) of {} bytes",
                group.hash_hex(),
                group.len(),
                group.size
            );
        }

        log::info!(
            "Hashing complete: {} groups, {} cache hits, {} misses, {} failed",
            groups.len(),
            report.hash_stats.cache_hits,
            report.hash_stats.cache_misses,
            report.hash_stats.failed_files
        );

        Ok(groups)
    }

    /// Resolve one candidate, reporting completion progress.
    ///
    /// Workers finish in arbitrary order, so the reported count comes from a
    /// shared completion counter rather than the input index; the lock is
    /// held through the callback so observed counts never go backwards.
    fn resolve_one(&self, completed: &Mutex<usize>, path: PathBuf) -> HashTask {
        if self.config.is_shutdown_requested() {
            return HashTask::Interrupted;
        }

        let label = self
            .config
            .progress_callback
            .as_ref()
            .map(|_| path.to_string_lossy().into_owned());

        let task = self.resolve_digest(path);

        if let (Some(callback), Some(label)) = (self.config.progress_callback.as_ref(), label) {
            if !matches!(task, HashTask::Interrupted) {
                let mut done = completed
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                *done += 1;
                callback.on_progress(*done, &label);
            }
        }

        task
    }

    /// Resolve one candidate's digest via cache or fresh hash.
    fn resolve_digest(&self, path: PathBuf) -> HashTask {
        // Current mtime decides whether a cached digest may be trusted.
        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), e);
                return HashTask::Failed(match e.kind() {
                    std::io::ErrorKind::NotFound => HashError::NotFound(path),
                    std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path),
                    _ => HashError::Io {
                        path,
                        source: Arc::new(e),
                    },
                });
            }
        };
        let size = metadata.len();
        let modified = match metadata.modified() {
            Ok(m) => m,
            Err(e) => {
                return HashTask::Failed(HashError::Io {
                    path,
                    source: Arc::new(e),
                })
            }
        };

        match self.config.cache.lookup(&path) {
            Ok(Some(record)) if record.is_current(modified) => {
                log::trace!("Cache hit: {}", path.display());
                return HashTask::Resolved {
                    path,
                    size,
                    hash: record.content_hash,
                    cache_hit: true,
                };
            }
            Ok(Some(_)) => log::trace!("Cache stale: {}", path.display()),
            Ok(None) => log::trace!("Cache miss: {}", path.display()),
            Err(e) => log::warn!("Cache lookup failed for {}: {}", path.display(), e),
        }

        match self.hasher.hash_file(&path) {
            Ok(hash) => {
                let record = FileRecord::new(path.clone(), modified, hash);
                if let Err(e) = self.config.cache.upsert(&record) {
                    log::warn!("Cache upsert failed for {}: {}", path.display(), e);
                }
                HashTask::Resolved {
                    path,
                    size,
                    hash,
                    cache_hit: false,
                }
            }
            Err(HashError::Interrupted(_)) => HashTask::Interrupted,
            Err(e) => {
                log::warn!("Skipping unhashable file: {}", e);
                HashTask::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path, content: &[u8]) {
        File::create(path).unwrap().write_all(content).unwrap();
    }

    fn engine_for(dir: &Path, cache_path: &Path) -> DuplicateEngine {
        let cache = Arc::new(HashCache::open(cache_path).unwrap());
        let roots = vec![dir.to_string_lossy().into_owned()];
        DuplicateEngine::new(EngineConfig::new(roots, cache))
    }

    #[test]
    fn test_scenario_from_four_files() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"), b"hello01234");
        touch(&dir.path().join("b.txt"), b"hello01234");
        touch(&dir.path().join("c.txt"), b"world!!!!!");
        touch(&dir.path().join("d.bin"), b"abc");

        let engine = engine_for(dir.path(), &cache_dir.path().join("cache.db"));
        let report = engine.run(false).unwrap();

        assert_eq!(report.found, 4);
        // d.bin has a unique size and never reaches hashing
        assert_eq!(report.filtered, 3);
        assert_eq!(report.groups.len(), 1);
        let group = &report.groups[0];
        assert_eq!(group.len(), 2);
        assert!(group.paths[0].ends_with("a.txt"));
        assert!(group.paths[1].ends_with("b.txt"));
        // All four files untouched on a dry run
        assert!(dir.path().join("c.txt").exists());
        assert!(dir.path().join("d.bin").exists());
    }

    #[test]
    fn test_second_run_is_all_cache_hits() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        let db = cache_dir.path().join("cache.db");
        touch(&dir.path().join("a"), b"same content");
        touch(&dir.path().join("b"), b"same content");

        let engine = engine_for(dir.path(), &db);
        let first = engine.run(false).unwrap();
        assert_eq!(first.hash_stats.cache_hits, 0);
        assert_eq!(first.hash_stats.cache_misses, 2);

        let engine = engine_for(dir.path(), &db);
        let second = engine.run(false).unwrap();
        assert_eq!(second.hash_stats.cache_hits, 2);
        assert_eq!(second.hash_stats.cache_misses, 0);
        assert_eq!(second.hash_stats.bytes_hashed, 0);
        assert_eq!(second.groups, first.groups);
    }

    #[test]
    fn test_mtime_change_invalidates_cache() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        let db = cache_dir.path().join("cache.db");
        let a = dir.path().join("a");
        touch(&a, b"same content");
        touch(&dir.path().join("b"), b"same content");

        engine_for(dir.path(), &db).run(false).unwrap();

        // Same size and content, different mtime: must be re-hashed.
        filetime::set_file_mtime(&a, filetime::FileTime::from_unix_time(1_000_000, 0)).unwrap();

        let report = engine_for(dir.path(), &db).run(false).unwrap();
        assert_eq!(report.hash_stats.cache_hits, 1);
        assert_eq!(report.hash_stats.cache_misses, 1);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn test_delete_keeps_one_representative() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"), b"dup");
        touch(&dir.path().join("b.txt"), b"dup");
        touch(&dir.path().join("c.txt"), b"dup");

        let engine = engine_for(dir.path(), &cache_dir.path().join("cache.db"));
        let report = engine.run(true).unwrap();

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.deletions.len(), 2);
        assert!(report.deletions.iter().all(|d| d.error.is_none()));
        // Lexicographically smallest path survives
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
        assert!(!dir.path().join("c.txt").exists());
    }

    #[test]
    fn test_no_duplicates_yields_empty_report() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        touch(&dir.path().join("a"), b"one");
        touch(&dir.path().join("b"), b"three");

        let engine = engine_for(dir.path(), &cache_dir.path().join("cache.db"));
        let report = engine.run(false).unwrap();

        assert_eq!(report.found, 2);
        assert_eq!(report.filtered, 0);
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_same_size_different_content_not_grouped() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        touch(&dir.path().join("a"), b"aaaa");
        touch(&dir.path().join("b"), b"bbbb");

        let engine = engine_for(dir.path(), &cache_dir.path().join("cache.db"));
        let report = engine.run(false).unwrap();

        assert_eq!(report.filtered, 2);
        assert!(report.groups.is_empty());
    }

    /// Records the `current` values the hash stage reports.
    #[derive(Default)]
    struct HashProgressRecorder {
        in_hash_phase: std::sync::atomic::AtomicBool,
        updates: Mutex<Vec<usize>>,
    }

    impl ProgressCallback for HashProgressRecorder {
        fn on_phase_start(&self, phase: &str, _total: usize) {
            self.in_hash_phase
                .store(phase == "hash", Ordering::SeqCst);
        }

        fn on_progress(&self, current: usize, _item: &str) {
            if self.in_hash_phase.load(Ordering::SeqCst) {
                self.updates.lock().unwrap().push(current);
            }
        }

        fn on_phase_end(&self, _phase: &str) {}
    }

    #[test]
    fn test_parallel_hash_progress_is_monotonic() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        // Same size, distinct contents: every file reaches the hash stage.
        for i in 0..200 {
            touch(&dir.path().join(format!("f{i:03}")), format!("{i:03}").as_bytes());
        }

        let cache = Arc::new(HashCache::open(&cache_dir.path().join("cache.db")).unwrap());
        let recorder = Arc::new(HashProgressRecorder::default());
        let config = EngineConfig::new(vec![dir.path().to_string_lossy().into_owned()], cache)
            .with_io_threads(4)
            .with_progress_callback(recorder.clone());

        DuplicateEngine::new(config).run(false).unwrap();

        let updates = recorder.updates.lock().unwrap();
        assert_eq!(updates.len(), 200);
        assert_eq!(*updates.last().unwrap(), 200);
        let violations = updates.windows(2).filter(|w| w[1] <= w[0]).count();
        assert_eq!(violations, 0);
    }

    /// Requests shutdown the moment the deletion stage starts.
    struct CancelOnDelete {
        flag: Arc<AtomicBool>,
    }

    impl ProgressCallback for CancelOnDelete {
        fn on_phase_start(&self, phase: &str, _total: usize) {
            if phase == "delete" {
                self.flag.store(true, Ordering::SeqCst);
            }
        }

        fn on_progress(&self, _current: usize, _item: &str) {}

        fn on_phase_end(&self, _phase: &str) {}
    }

    #[test]
    fn test_shutdown_during_deletion_interrupts() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        touch(&a, b"dup");
        touch(&b, b"dup");

        let cache = Arc::new(HashCache::open(&cache_dir.path().join("cache.db")).unwrap());
        let flag = Arc::new(AtomicBool::new(false));
        let config = EngineConfig::new(vec![dir.path().to_string_lossy().into_owned()], cache)
            .with_shutdown_flag(flag.clone())
            .with_progress_callback(Arc::new(CancelOnDelete { flag }));

        let err = DuplicateEngine::new(config).run(true).unwrap_err();
        assert!(matches!(err, EngineError::Interrupted));
        // The pass stopped before removing anything.
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn test_shutdown_before_run_interrupts() {
        let dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();
        touch(&dir.path().join("a"), b"x");

        let cache = Arc::new(HashCache::open(&cache_dir.path().join("cache.db")).unwrap());
        let flag = Arc::new(AtomicBool::new(true));
        let config = EngineConfig::new(vec![dir.path().to_string_lossy().into_owned()], cache)
            .with_shutdown_flag(flag);

        let err = DuplicateEngine::new(config).run(false).unwrap_err();
        assert!(matches!(err, EngineError::Interrupted));
    }
}
