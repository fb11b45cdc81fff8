//! Duplicate detection: size pre-filter, hashing engine, and grouping.

pub mod engine;
pub mod groups;

pub use engine::{
    DuplicateEngine, EngineConfig, EngineError, HashStats, RunReport, DEFAULT_IO_THREADS,
};
pub use groups::{filter_by_size, DuplicateGroup, SizeFilterOutcome, SizeFilterStats};
