//! Per-file extraction: comment/string masking, construct patterns, the
//! offset-to-line index, and the `FileScan` that the builder and the
//! detectors both consume.

pub mod file_scan;
pub mod line_index;
pub mod mask;
pub mod patterns;

pub use file_scan::{Call, Definition, FileScan, Import, ImportKind, PackageDecl, PrivateRef, Scope};
pub use line_index::LineIndex;
pub use mask::MaskedText;
