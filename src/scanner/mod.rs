//! Scanner module for candidate enumeration and file hashing.
//!
//! This module provides functionality for:
//! - Expanding configured root patterns into candidate file lists
//! - Content hashing with SHA-256
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: root pattern expansion and candidate enumeration
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Enumerator;
//!
//! let roots = vec!["/home/user/photos".to_string()];
//! let enumerator = Enumerator::new(&roots);
//! let outcome = enumerator.enumerate();
//! println!("{} candidates", outcome.candidates.len());
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;
use std::sync::Arc;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::{EnumerateOutcome, Enumerator};

/// Errors that can occur during candidate enumeration.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// A configured root pattern matched nothing on disk.
    #[error("Root not found: {0}")]
    RootNotFound(String),

    /// A configured root pattern is not valid glob syntax.
    #[error("Invalid root pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern from the configuration
        pattern: String,
        /// Parser message describing the problem
        message: String,
    },

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The file was not found (deleted mid-run).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing was abandoned because shutdown was requested.
    #[error("Hash interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::RootNotFound("/missing/**".to_string());
        assert_eq!(err.to_string(), "Root not found: /missing/**");

        let err = ScanError::PermissionDenied(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "Permission denied: /test");

        let err = ScanError::InvalidPattern {
            pattern: "[".to_string(),
            message: "unclosed character class".to_string(),
        };
        assert!(err.to_string().contains('['));
    }

    #[test]
    fn test_hash_error_display() {
        let err = HashError::NotFound(PathBuf::from("/gone"));
        assert_eq!(err.to_string(), "File not found: /gone");

        let err = HashError::Interrupted(PathBuf::from("/big"));
        assert_eq!(err.to_string(), "Hash interrupted: /big");
    }
}
