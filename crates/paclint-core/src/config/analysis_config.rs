//! Analysis configuration: rule thresholds and rule selection.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the cross-file rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Instability below which a package is stable. Default: 0.3.
    pub stable_threshold: Option<f64>,
    /// Instability above which a package is unstable. Default: 0.7.
    pub unstable_threshold: Option<f64>,
    /// Dependency count above which a package is a god package. Default: 10.
    pub max_dependencies: Option<usize>,
    /// Export count above which a package exports too much. Default: 50.
    pub max_exports: Option<usize>,
    /// Export count below which a package exports too little. Default: 3.
    pub min_exports: Option<usize>,
    /// Line count above which a package is too large. Default: 2000.
    pub max_package_lines: Option<usize>,
    /// Line count below which a package is too small. Default: 50.
    pub min_package_lines: Option<usize>,
    /// Private/public symbol ratio above which an API is over-abstracted. Default: 10.
    pub over_abstraction_ratio: Option<f64>,
    /// References above which a private symbol is used like public API. Default: 10.
    pub heavy_private_use: Option<u32>,
    /// Rule keys that are never reported.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl AnalysisConfig {
    pub fn effective_stable_threshold(&self) -> f64 {
        self.stable_threshold
            .unwrap_or(constants::DEFAULT_STABLE_THRESHOLD)
    }

    pub fn effective_unstable_threshold(&self) -> f64 {
        self.unstable_threshold
            .unwrap_or(constants::DEFAULT_UNSTABLE_THRESHOLD)
    }

    pub fn effective_max_dependencies(&self) -> usize {
        self.max_dependencies
            .unwrap_or(constants::DEFAULT_MAX_DEPENDENCIES)
    }

    pub fn effective_max_exports(&self) -> usize {
        self.max_exports.unwrap_or(constants::DEFAULT_MAX_EXPORTS)
    }

    pub fn effective_min_exports(&self) -> usize {
        self.min_exports.unwrap_or(constants::DEFAULT_MIN_EXPORTS)
    }

    pub fn effective_max_package_lines(&self) -> usize {
        self.max_package_lines
            .unwrap_or(constants::DEFAULT_MAX_PACKAGE_LINES)
    }

    pub fn effective_min_package_lines(&self) -> usize {
        self.min_package_lines
            .unwrap_or(constants::DEFAULT_MIN_PACKAGE_LINES)
    }

    pub fn effective_over_abstraction_ratio(&self) -> f64 {
        self.over_abstraction_ratio
            .unwrap_or(constants::DEFAULT_OVER_ABSTRACTION_RATIO)
    }

    pub fn effective_heavy_private_use(&self) -> u32 {
        self.heavy_private_use
            .unwrap_or(constants::DEFAULT_HEAVY_PRIVATE_USE)
    }
}
