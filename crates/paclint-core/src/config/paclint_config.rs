//! Top-level paclint configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ScanConfig, SinkConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (`ConfigOverrides`)
/// 2. Environment variables (`PACLINT_*`)
/// 3. Project config (`paclint.toml` in the project root)
/// 4. User config (`~/.paclint/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PaclintConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
    pub sink: SinkConfig,
}

/// Overrides a host applies on top of every file and env layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub scan_threads: Option<usize>,
    pub scan_max_file_size: Option<u64>,
    pub sink_channel_capacity: Option<usize>,
    pub disabled_rules: Vec<String>,
}

impl PaclintConfig {
    /// Load configuration for the project at `root` with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // User config (lowest file priority). Unreadable files are ignored,
        // invalid TOML is not.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config)?;

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &PaclintConfig) -> Result<(), ConfigError> {
        for (field, value) in [
            ("analysis.stable_threshold", config.analysis.stable_threshold),
            ("analysis.unstable_threshold", config.analysis.unstable_threshold),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }
        if config.analysis.effective_stable_threshold()
            >= config.analysis.effective_unstable_threshold()
        {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.stable_threshold".to_string(),
                message: "must be lower than analysis.unstable_threshold".to_string(),
            });
        }
        if config.analysis.effective_min_exports() > config.analysis.effective_max_exports() {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.min_exports".to_string(),
                message: "must not exceed analysis.max_exports".to_string(),
            });
        }
        if let Some(ratio) = config.analysis.over_abstraction_ratio {
            if ratio <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.over_abstraction_ratio".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.effective_min_lines() > config.scan.effective_max_lines() {
            return Err(ConfigError::ValidationFailed {
                field: "scan.min_lines".to_string(),
                message: "must not exceed scan.max_lines".to_string(),
            });
        }
        if config.sink.channel_capacity == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "sink.channel_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.sink.poll_interval_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "sink.poll_interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.paclint/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".paclint").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut PaclintConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PaclintConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.merge(&file_config);
        Ok(())
    }

    /// Merge `other` into `self`; only values `other` actually sets win.
    pub fn merge(&mut self, other: &PaclintConfig) {
        // Scan
        if other.scan.min_lines.is_some() {
            self.scan.min_lines = other.scan.min_lines;
        }
        if other.scan.max_lines.is_some() {
            self.scan.max_lines = other.scan.max_lines;
        }
        if other.scan.max_file_size.is_some() {
            self.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            self.scan.threads = other.scan.threads;
        }
        if !other.scan.extensions.is_empty() {
            self.scan.extensions = other.scan.extensions.clone();
        }
        if other.scan.follow_symlinks.is_some() {
            self.scan.follow_symlinks = other.scan.follow_symlinks;
        }

        // Analysis
        let a = &other.analysis;
        if a.stable_threshold.is_some() {
            self.analysis.stable_threshold = a.stable_threshold;
        }
        if a.unstable_threshold.is_some() {
            self.analysis.unstable_threshold = a.unstable_threshold;
        }
        if a.max_dependencies.is_some() {
            self.analysis.max_dependencies = a.max_dependencies;
        }
        if a.max_exports.is_some() {
            self.analysis.max_exports = a.max_exports;
        }
        if a.min_exports.is_some() {
            self.analysis.min_exports = a.min_exports;
        }
        if a.max_package_lines.is_some() {
            self.analysis.max_package_lines = a.max_package_lines;
        }
        if a.min_package_lines.is_some() {
            self.analysis.min_package_lines = a.min_package_lines;
        }
        if a.over_abstraction_ratio.is_some() {
            self.analysis.over_abstraction_ratio = a.over_abstraction_ratio;
        }
        if a.heavy_private_use.is_some() {
            self.analysis.heavy_private_use = a.heavy_private_use;
        }
        if !a.disabled_rules.is_empty() {
            self.analysis.disabled_rules = a.disabled_rules.clone();
        }

        // Sink
        let s = &other.sink;
        if s.channel_capacity.is_some() {
            self.sink.channel_capacity = s.channel_capacity;
        }
        if s.poll_interval_ms.is_some() {
            self.sink.poll_interval_ms = s.poll_interval_ms;
        }
        if s.shutdown_timeout_ms.is_some() {
            self.sink.shutdown_timeout_ms = s.shutdown_timeout_ms;
        }
        if s.send_timeout_ms.is_some() {
            self.sink.send_timeout_ms = s.send_timeout_ms;
        }
        if s.max_commit_retries.is_some() {
            self.sink.max_commit_retries = s.max_commit_retries;
        }
        if s.progress_interval.is_some() {
            self.sink.progress_interval = s.progress_interval;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PACLINT_SCAN_THREADS`, `PACLINT_ANALYSIS_STABLE_THRESHOLD`, etc.
    /// A variable that is set but does not parse is an error, not a silent default.
    fn apply_env_overrides(config: &mut PaclintConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<usize>("PACLINT_SCAN_MIN_LINES")? {
            config.scan.min_lines = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PACLINT_SCAN_MAX_LINES")? {
            config.scan.max_lines = Some(v);
        }
        if let Some(v) = env_parse::<u64>("PACLINT_SCAN_MAX_FILE_SIZE")? {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PACLINT_SCAN_THREADS")? {
            config.scan.threads = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PACLINT_ANALYSIS_STABLE_THRESHOLD")? {
            config.analysis.stable_threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PACLINT_ANALYSIS_UNSTABLE_THRESHOLD")? {
            config.analysis.unstable_threshold = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PACLINT_ANALYSIS_MAX_DEPENDENCIES")? {
            config.analysis.max_dependencies = Some(v);
        }
        if let Ok(val) = std::env::var("PACLINT_ANALYSIS_DISABLED_RULES") {
            config.analysis.disabled_rules = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = env_parse::<usize>("PACLINT_SINK_CHANNEL_CAPACITY")? {
            config.sink.channel_capacity = Some(v);
        }
        if let Some(v) = env_parse::<u64>("PACLINT_SINK_SHUTDOWN_TIMEOUT_MS")? {
            config.sink.shutdown_timeout_ms = Some(v);
        }
        if let Some(v) = env_parse::<u64>("PACLINT_SINK_SEND_TIMEOUT_MS")? {
            config.sink.send_timeout_ms = Some(v);
        }
        Ok(())
    }

    fn apply_overrides(config: &mut PaclintConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = overrides.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = overrides.sink_channel_capacity {
            config.sink.channel_capacity = Some(v);
        }
        if !overrides.disabled_rules.is_empty() {
            config.analysis.disabled_rules = overrides.disabled_rules.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: name.to_string(),
                message: format!("{val:?}: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
