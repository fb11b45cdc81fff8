//! Command-line interface definitions.
//!
//! A single command surface: scan the configured roots and report (or
//! delete) duplicates. The default is a dry run; deletion must be asked
//! for explicitly.
//!
//! # Example
//!
//! ```bash
//! # Dry run: report duplicate groups only
//! dupescan
//!
//! # Delete all but one representative per group
//! dupescan --delete
//!
//! # Explicit config and cache locations, more hashing threads
//! dupescan --config ./dupescan.toml --cache ./hashes.db --io-threads 4
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::duplicates::DEFAULT_IO_THREADS;

/// Duplicate file finder with a persistent hash cache.
///
/// Scans the root path patterns listed in the configuration file, groups
/// files by content hash, and reports duplicate groups. With `--delete`,
/// all but the first (lexicographically smallest) member of each group
/// are removed.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Delete redundant duplicates (default: dry run, report only)
    #[arg(short, long)]
    pub delete: bool,

    /// Path to the configuration file
    ///
    /// Defaults to the platform config directory (e.g.
    /// ~/.config/dupescan/dupescan.toml on Linux).
    #[arg(long, value_name = "FILE", env = "DUPESCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the hash cache store
    ///
    /// Defaults to the platform data directory (e.g.
    /// ~/.local/share/dupescan/hashes.db on Linux).
    #[arg(long, value_name = "FILE", env = "DUPESCAN_CACHE")]
    pub cache: Option<PathBuf>,

    /// Number of I/O threads for hashing
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_IO_THREADS)]
    pub io_threads: usize,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars and all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["dupescan"]);
        assert!(!cli.delete);
        assert!(cli.config.is_none());
        assert_eq!(cli.io_threads, DEFAULT_IO_THREADS);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_delete_flag() {
        let cli = Cli::parse_from(["dupescan", "--delete"]);
        assert!(cli.delete);
    }

    #[test]
    fn test_explicit_paths_and_threads() {
        let cli = Cli::parse_from([
            "dupescan",
            "--config",
            "/tmp/conf.toml",
            "--cache",
            "/tmp/hashes.db",
            "--io-threads",
            "8",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/conf.toml")));
        assert_eq!(cli.cache, Some(PathBuf::from("/tmp/hashes.db")));
        assert_eq!(cli.io_threads, 8);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dupescan", "-q", "-v"]).is_err());
    }
}
