//! Source units: the host-facing input interface, stock implementations,
//! directory discovery, and test/implementation classification.

pub mod classifier;
pub mod source;
pub mod walker;

pub use classifier::{classify, file_name, UnitKind};
pub use source::{FsUnit, MemoryUnit, SourceUnit};
pub use walker::discover_units;
