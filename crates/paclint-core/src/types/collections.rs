//! Re-exports of the collection types used across the workspace.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec for cycle paths (usually short).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
