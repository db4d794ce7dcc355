//! paclint-storage: where findings go once analysis produces them.
//!
//! Analysis workers hand findings to a `FindingWriter`, which queues them on a
//! bounded channel and commits them from one dedicated thread through a
//! `FindingCommitter`.

pub mod sink;

pub use sink::{
    FindingCommitter, FindingWriter, JsonLinesCommitter, LogCommitter, MemoryCommitter,
    WriteStats,
};
