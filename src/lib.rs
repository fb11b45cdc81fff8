//! dupescan - duplicate file finder with a persistent hash cache.
//!
//! Finds duplicate files under configured root patterns using a size-based
//! pre-filter and SHA-256 content hashing, with a per-file hash cache that
//! avoids re-reading unchanged files across runs. With deletion enabled,
//! all but one representative of each duplicate group are removed.

pub mod actions;
pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::sync::Arc;

use anyhow::Context;

use crate::cache::HashCache;
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateEngine, EngineConfig, EngineError, RunReport};
use crate::error::ExitCode;
use crate::progress::{Progress, ProgressCallback};

/// Run the application end to end.
///
/// # Errors
///
/// Returns an error only for fatal failures: the configuration cannot be
/// loaded, the cache store cannot be opened, or the signal handler cannot
/// be installed. Per-root and per-file problems are reported and the run
/// completes with [`ExitCode::Success`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let shutdown = signal::install_handler().context("Failed to install signal handler")?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let cache_path = match cli.cache {
        Some(p) => p,
        None => Config::default_cache_path().context("Failed to locate cache directory")?,
    };
    let cache = Arc::new(HashCache::open(&cache_path).context("Failed to open hash cache")?);

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));
    let engine_config = EngineConfig::new(config.roots, cache)
        .with_io_threads(cli.io_threads)
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(progress);

    let engine = DuplicateEngine::new(engine_config);
    match engine.run(cli.delete) {
        Ok(report) => {
            print_report(&report);
            Ok(ExitCode::Success)
        }
        Err(EngineError::Interrupted) => {
            eprintln!("Interrupted.");
            Ok(ExitCode::Interrupted)
        }
        Err(e) => Err(e.into()),
    }
}

/// Render the run report to stdout.
fn print_report(report: &RunReport) {
    println!("FoundFiles: {}", report.found);
    println!("FilteredFiles: {}", report.filtered);
    println!("GroupedFiles: {}", report.groups.len());

    for group in &report.groups {
        if let Some(keep) = group.representative() {
            println!("keep   {}", keep.display());
        }
        for path in group.redundant() {
            if report.delete_enabled {
                println!("delete {}", path.display());
            } else {
                println!("would delete {}", path.display());
            }
        }
    }

    if !report.groups.is_empty() {
        println!(
            "Reclaimable: {} across {} redundant file(s)",
            format_size(report.reclaimable_space()),
            report.redundant_files()
        );
    }

    if report.delete_enabled {
        let deleted = report.deletions.iter().filter(|d| d.succeeded()).count();
        let failed = report.deletions.len() - deleted;
        println!("Deleted: {} ({} failed)", deleted, failed);
        for failure in report.deletions.iter().filter(|d| !d.succeeded()) {
            println!(
                "failed {}: {}",
                failure.path.display(),
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let skipped = report.scan_errors.len() + report.hash_errors.len();
    if skipped > 0 {
        println!("Skipped: {} path(s), see log for details", skipped);
    }

    println!(
        "Cache: {} hit(s), {} miss(es)",
        report.hash_stats.cache_hits, report.hash_stats.cache_misses
    );
    println!("Elapsed: {:.2?}", report.duration);
}

/// Format a byte size as a human-readable string.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }
}
