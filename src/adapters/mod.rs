//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `gbdt`: pure-Rust evaluation of the exported tree-model artifact
//! - `sqlite`: SQLite for local storage
//! - `sanitize`: health-data filtering for logs

pub mod gbdt;
pub mod sanitize;
pub mod sqlite;

// Re-export storage error for lib.rs
pub use sqlite::StorageError;
