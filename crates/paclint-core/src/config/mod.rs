//! Configuration system for paclint.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod analysis_config;
pub mod paclint_config;
pub mod scan_config;
pub mod sink_config;

pub use analysis_config::AnalysisConfig;
pub use paclint_config::{ConfigOverrides, PaclintConfig};
pub use scan_config::ScanConfig;
pub use sink_config::SinkConfig;
