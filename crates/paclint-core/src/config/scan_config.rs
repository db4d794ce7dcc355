//! Scan configuration: which source units are eligible for analysis.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for unit discovery and eligibility.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Units with fewer lines are skipped. Default: 3.
    pub min_lines: Option<usize>,
    /// Units with more lines are skipped. Default: 25000.
    pub max_lines: Option<usize>,
    /// Units larger than this many bytes are skipped. Default: 1MB.
    pub max_file_size: Option<u64>,
    /// Stage 2 worker threads. 0 means available parallelism.
    pub threads: Option<usize>,
    /// File extensions to discover, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Follow symbolic links while walking. Default: false.
    pub follow_symlinks: Option<bool>,
}

impl ScanConfig {
    pub fn effective_min_lines(&self) -> usize {
        self.min_lines.unwrap_or(constants::DEFAULT_MIN_LINES)
    }

    pub fn effective_max_lines(&self) -> usize {
        self.max_lines.unwrap_or(constants::DEFAULT_MAX_LINES)
    }

    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(constants::DEFAULT_MAX_FILE_SIZE)
    }

    /// Worker count, resolving 0 (or unset) to the machine's parallelism.
    pub fn effective_threads(&self) -> usize {
        match self.threads.unwrap_or(constants::DEFAULT_THREADS) {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            constants::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect()
        } else {
            self.extensions.clone()
        }
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }
}
