//! Cache record definitions.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::scanner::Hash;

/// A persisted file record: the single source of truth for a path's
/// last-known content hash across runs.
///
/// A record is valid evidence of the file's hash only while the file's
/// current modification time equals [`FileRecord::modified_ns`]; once the
/// file is touched the record is stale and must be recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute file path (unique key in the store)
    pub path: PathBuf,
    /// Last-observed modification time, nanoseconds since the Unix epoch
    pub modified_ns: i64,
    /// SHA-256 digest of the file contents at that time
    pub content_hash: Hash,
}

impl FileRecord {
    /// Create a record for a freshly hashed file.
    #[must_use]
    pub fn new(path: PathBuf, modified: SystemTime, content_hash: Hash) -> Self {
        Self {
            path,
            modified_ns: system_time_to_nanos(modified),
            content_hash,
        }
    }

    /// Check whether this record is still valid for a file with the given
    /// current modification time.
    #[must_use]
    pub fn is_current(&self, modified: SystemTime) -> bool {
        self.modified_ns == system_time_to_nanos(modified)
    }
}

/// Convert a `SystemTime` to whole nanoseconds since the Unix epoch.
///
/// Pre-epoch timestamps map to negative values. Saturates at the i64
/// range bounds (roughly the years 1678..2262).
#[must_use]
pub fn system_time_to_nanos(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_nanos())
            .map(i64::wrapping_neg)
            .unwrap_or(i64::MIN),
    }
}

/// Convert stored nanoseconds back to a `SystemTime`.
#[must_use]
pub fn nanos_to_system_time(ns: i64) -> SystemTime {
    if ns >= 0 {
        UNIX_EPOCH + Duration::from_nanos(ns as u64)
    } else {
        UNIX_EPOCH - Duration::from_nanos(ns.unsigned_abs())
    }
}
