//! Read-only graph queries.
//!
//! Every query takes `&DependencyGraph` and allocates only its own result,
//! so any number of workers may run them concurrently. Names the graph does
//! not know are treated as absent, never as errors.

pub mod cycles;
pub mod exports;
pub mod imports;
pub mod instability;
pub mod transitive;

pub use cycles::find_cycle;
pub use exports::{
    abstraction_ratio, called_once, heavily_used_private, incomplete_api, is_dead_package,
    unused_exports, unused_public, ApiGap,
};
pub use imports::{missing_imports, unused_imports, MissingImport};
pub use instability::{instability, metrics, unstable_dependencies, PackageMetrics};
pub use transitive::{could_be_direct, diamonds, transitive_deps, Diamond};
