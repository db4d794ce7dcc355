//! The package dependency and symbol model.
//!
//! Lifecycle: a `GraphBuilder` is the only writer while units are ingested
//! one at a time. `finish()` consumes it and yields a `DependencyGraph`
//! with no mutating methods, which is shared read-only (usually behind an
//! `Arc`) by every analysis worker. `reset()` turns the graph back into an
//! empty builder for the next run.

pub mod builder;
pub mod frozen;
pub mod types;

pub use builder::GraphBuilder;
pub use frozen::DependencyGraph;
pub use types::{FileRecord, GraphTables, Package, Symbol};
