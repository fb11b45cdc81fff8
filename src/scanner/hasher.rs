//! Streaming SHA-256 file hasher.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256 digests
//! of file contents using memory-efficient streaming. The whole byte stream
//! is hashed, including the empty stream, so two zero-length files produce
//! the same (well-defined) digest and correctly group together.
//!
//! Digest equality is ordinary fixed-length byte-slice equality on
//! `[u8; 32]`; digests of different lengths cannot exist by construction.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Hasher, hash_to_hex};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash_file(Path::new("/some/file")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::HashError;

/// A SHA-256 content digest.
pub type Hash = [u8; 32];

/// Read buffer size for streaming hashes.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Convert a digest to its lowercase hexadecimal representation.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(64);
    for byte in hash {
        let _ = write!(s, "{:02x}", byte);
    }
    s
}

/// Streaming file hasher.
///
/// Reads file contents in fixed-size chunks and feeds them through SHA-256.
/// An optional shutdown flag is checked between chunks so the hash of a
/// large file can be abandoned promptly on Ctrl+C.
#[derive(Debug, Default)]
pub struct Hasher {
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Compute the SHA-256 digest of a file's full contents.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] or [`HashError::PermissionDenied`]
    /// for the corresponding I/O failures, [`HashError::Interrupted`] if a
    /// shutdown was requested mid-read, and [`HashError::Io`] otherwise.
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            let n = file.read(&mut buffer).map_err(|e| map_io_error(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(hasher.finalize().into())
    }
}

fn map_io_error(path: &Path, e: std::io::Error) -> HashError {
    match e.kind() {
        std::io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: Arc::new(e),
        },
    }
}
