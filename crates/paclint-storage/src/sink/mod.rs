//! Finding sink: crossbeam-channel bounded queue, dedicated consumer thread.

pub mod committer;
pub mod stats;
pub mod writer;

pub use committer::{FindingCommitter, JsonLinesCommitter, LogCommitter, MemoryCommitter};
pub use stats::WriteStats;
pub use writer::FindingWriter;
