//! Shared constants for the paclint analysis engine.

/// paclint version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Files with fewer lines than this are skipped.
pub const DEFAULT_MIN_LINES: usize = 3;

/// Files with more lines than this are skipped.
pub const DEFAULT_MAX_LINES: usize = 25_000;

/// Maximum file size in bytes for scanning (default: 1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Default number of threads (0 = auto-detect).
pub const DEFAULT_THREADS: usize = 0;

/// File extensions analyzed when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["m", "wl", "wlt"];

/// Instability below which a package counts as stable.
pub const DEFAULT_STABLE_THRESHOLD: f64 = 0.3;

/// Instability above which a package counts as unstable.
pub const DEFAULT_UNSTABLE_THRESHOLD: f64 = 0.7;

/// More declared dependencies than this makes a god package.
pub const DEFAULT_MAX_DEPENDENCIES: usize = 10;

/// Export count bounds.
pub const DEFAULT_MAX_EXPORTS: usize = 50;
pub const DEFAULT_MIN_EXPORTS: usize = 3;

/// Package size bounds in lines.
pub const DEFAULT_MAX_PACKAGE_LINES: usize = 2000;
pub const DEFAULT_MIN_PACKAGE_LINES: usize = 50;

/// Private-to-public symbol ratio above which an API is over-abstracted.
pub const DEFAULT_OVER_ABSTRACTION_RATIO: f64 = 10.0;

/// Reference count above which a private symbol is used like public API.
pub const DEFAULT_HEAVY_PRIVATE_USE: u32 = 10;

/// Finding sink channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10_000;

/// Consumer poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Bounded wait for the consumer on shutdown, in milliseconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 30_000;

/// Longest `send` waits on a full queue, in milliseconds.
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 30_000;

/// Commit attempts after the first failure before a finding is given up on.
pub const DEFAULT_MAX_COMMIT_RETRIES: u32 = 3;

/// Files between two analysis progress events.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "paclint.toml";
