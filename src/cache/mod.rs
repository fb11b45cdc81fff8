//! Persistent hash cache.
//!
//! This module provides cross-run storage for file content hashes so that
//! unchanged files are never re-read on later scans.
//!
//! # Architecture
//!
//! * [`database`]: SQLite-backed persistence, schema management, and the
//!   `lookup`/`upsert` operations.
//! * [`entry`]: the [`FileRecord`] data model and its staleness check.
//!
//! # Cache Invalidation
//!
//! A record is keyed by path and carries the file's modification time as
//! observed when the hash was computed. If the current mtime differs, the
//! record is stale: the file is re-hashed and the record overwritten.
//! Records for files that no longer exist are harmless and simply never
//! consulted again.

pub mod database;
pub mod entry;

pub use database::{CacheError, CacheResult, HashCache};
pub use entry::{nanos_to_system_time, system_time_to_nanos, FileRecord};
