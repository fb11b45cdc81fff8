//! Actions performed on confirmed duplicate groups.

pub mod delete;

pub use delete::{delete_redundant, DeleteOutcome};
