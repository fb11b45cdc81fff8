//! SQLite-backed hash cache store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::scanner::Hash;

use super::entry::FileRecord;

/// Errors from the hash cache store.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// The store file could not be opened or initialized.
    #[error("Failed to open cache at {path}: {source}")]
    Open {
        /// The store file path
        path: PathBuf,
        /// Underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// The directory meant to hold the store file could not be created.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A digest stored in the database does not have the expected length.
    #[error("Corrupt digest for {path}: expected 32 bytes, found {found}")]
    CorruptDigest {
        /// The record's path key
        path: PathBuf,
        /// Actual stored length
        found: usize,
    },

    /// Any other SQLite failure.
    #[error("Cache query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Persistent per-file hash cache using SQLite.
///
/// A single table keyed uniquely by path maps each file to its last-observed
/// modification time and content digest. The key is the path's encoded
/// OS-string bytes, not a lossy UTF-8 rendering, so two distinct non-UTF-8
/// paths can never collapse onto one record. The connection is guarded by
/// one mutex: `lookup` and `upsert` are each atomic, but a lookup-then-upsert
/// pair for the same path is not transactional. Two hashing workers that
/// both miss on the same path will both compute and both upsert; the race is
/// benign because both arrive at the same digest.
pub struct HashCache {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for HashCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashCache").finish_non_exhaustive()
    }
}

impl HashCache {
    /// Open (or create) the cache store at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Open`] if the file cannot be opened or the
    /// schema cannot be created. This is a fatal error for the run: there
    /// is no in-memory fallback, because cross-run reuse is the point of
    /// the cache.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CacheError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| CacheError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS file_records (
                path          BLOB PRIMARY KEY,
                modified_ns   INTEGER NOT NULL,
                content_hash  BLOB NOT NULL
            );",
        )
        .map_err(|e| CacheError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::debug!("Opened hash cache at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Look up the record for a path, if one exists.
    ///
    /// Staleness is the caller's concern: the returned record carries the
    /// mtime it was created under, and [`FileRecord::is_current`] decides
    /// whether the digest may be trusted.
    pub fn lookup(&self, path: &Path) -> CacheResult<Option<FileRecord>> {
        let conn = self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let row = conn
            .query_row(
                "SELECT modified_ns, content_hash FROM file_records WHERE path = ?1",
                params![path.as_os_str().as_encoded_bytes()],
                |row| {
                    let modified_ns: i64 = row.get(0)?;
                    let blob: Vec<u8> = row.get(1)?;
                    Ok((modified_ns, blob))
                },
            )
            .optional()?;

        match row {
            Some((modified_ns, blob)) => {
                let content_hash: Hash =
                    blob.as_slice()
                        .try_into()
                        .map_err(|_| CacheError::CorruptDigest {
                            path: path.to_path_buf(),
                            found: blob.len(),
                        })?;
                Ok(Some(FileRecord {
                    path: path.to_path_buf(),
                    modified_ns,
                    content_hash,
                }))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace the record for a path.
    ///
    /// The old record for the same path is never visible after this
    /// returns; replacement is a single statement under the store lock.
    pub fn upsert(&self, record: &FileRecord) -> CacheResult<()> {
        let conn = self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        conn.execute(
            "INSERT INTO file_records (path, modified_ns, content_hash)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(path) DO UPDATE SET
                 modified_ns = excluded.modified_ns,
                 content_hash = excluded.content_hash",
            params![
                record.path.as_os_str().as_encoded_bytes(),
                record.modified_ns,
                record.content_hash.as_slice()
            ],
        )?;
        Ok(())
    }

    /// Number of records currently in the store.
    pub fn len(&self) -> CacheResult<usize> {
        let conn = self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM file_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check whether the store holds no records.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    fn record(path: &str, secs: u64, byte: u8) -> FileRecord {
        FileRecord::new(
            PathBuf::from(path),
            UNIX_EPOCH + Duration::from_secs(secs),
            [byte; 32],
        )
    }

    #[test]
    fn test_lookup_absent_returns_none() {
        let dir = tempdir().unwrap();
        let cache = HashCache::open(&dir.path().join("cache.db")).unwrap();
        assert!(cache.lookup(Path::new("/nope")).unwrap().is_none());
    }

    #[test]
    fn test_upsert_then_lookup() {
        let dir = tempdir().unwrap();
        let cache = HashCache::open(&dir.path().join("cache.db")).unwrap();

        let rec = record("/a/file.txt", 1_700_000_000, 7);
        cache.upsert(&rec).unwrap();

        let found = cache.lookup(Path::new("/a/file.txt")).unwrap().unwrap();
        assert_eq!(found, rec);
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let dir = tempdir().unwrap();
        let cache = HashCache::open(&dir.path().join("cache.db")).unwrap();

        cache.upsert(&record("/a", 1, 1)).unwrap();
        cache.upsert(&record("/a", 2, 2)).unwrap();

        let found = cache.lookup(Path::new("/a")).unwrap().unwrap();
        assert_eq!(found.content_hash, [2u8; 32]);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_persists_across_open() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("cache.db");

        {
            let cache = HashCache::open(&db).unwrap();
            cache.upsert(&record("/persist", 42, 9)).unwrap();
        }

        let cache = HashCache::open(&db).unwrap();
        let found = cache.lookup(Path::new("/persist")).unwrap().unwrap();
        assert_eq!(found.content_hash, [9u8; 32]);
    }

    #[test]
    fn test_concurrent_upserts_distinct_paths() {
        use std::sync::Arc;

        let dir = tempdir().unwrap();
        let cache = Arc::new(HashCache::open(&dir.path().join("cache.db")).unwrap());

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache
                        .upsert(&record(&format!("/file{}", i), u64::from(i), i))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.len().unwrap(), 8);
    }

    #[cfg(unix)]
    #[test]
    fn test_distinct_non_utf8_paths_have_distinct_records() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let cache = HashCache::open(&dir.path().join("cache.db")).unwrap();

        // Both render as "/f\u{FFFD}" under lossy UTF-8 conversion.
        let p1 = PathBuf::from(OsStr::from_bytes(b"/f\x80"));
        let p2 = PathBuf::from(OsStr::from_bytes(b"/f\x81"));
        assert_eq!(p1.to_string_lossy(), p2.to_string_lossy());

        cache.upsert(&FileRecord::new(p1.clone(), UNIX_EPOCH, [1u8; 32])).unwrap();
        cache.upsert(&FileRecord::new(p2.clone(), UNIX_EPOCH, [2u8; 32])).unwrap();

        assert_eq!(cache.len().unwrap(), 2);
        assert_eq!(cache.lookup(&p1).unwrap().unwrap().content_hash, [1u8; 32]);
        assert_eq!(cache.lookup(&p2).unwrap().unwrap().content_hash, [2u8; 32]);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested/dirs/cache.db");
        let cache = HashCache::open(&nested).unwrap();
        assert!(cache.is_empty().unwrap());
        assert!(nested.exists());
    }
}
