//! Finding sink configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the asynchronous finding sink.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    /// Bounded queue capacity. Default: 10000.
    pub channel_capacity: Option<usize>,
    /// How often the consumer wakes to check for shutdown. Default: 100ms.
    pub poll_interval_ms: Option<u64>,
    /// Bounded wait for the consumer on shutdown. Default: 30s.
    pub shutdown_timeout_ms: Option<u64>,
    /// Longest a producer waits on a full queue before giving up. Default: 30s.
    pub send_timeout_ms: Option<u64>,
    /// Retries after a failed commit. Default: 3.
    pub max_commit_retries: Option<u32>,
    /// Files between analysis progress events. Default: 100.
    pub progress_interval: Option<usize>,
}

impl SinkConfig {
    pub fn effective_channel_capacity(&self) -> usize {
        self.channel_capacity
            .unwrap_or(constants::DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .unwrap_or(constants::DEFAULT_POLL_INTERVAL_MS),
        )
    }

    pub fn effective_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(
            self.shutdown_timeout_ms
                .unwrap_or(constants::DEFAULT_SHUTDOWN_TIMEOUT_MS),
        )
    }

    pub fn effective_send_timeout(&self) -> Duration {
        Duration::from_millis(
            self.send_timeout_ms
                .unwrap_or(constants::DEFAULT_SEND_TIMEOUT_MS),
        )
    }

    pub fn effective_max_commit_retries(&self) -> u32 {
        self.max_commit_retries
            .unwrap_or(constants::DEFAULT_MAX_COMMIT_RETRIES)
    }

    pub fn effective_progress_interval(&self) -> usize {
        self.progress_interval
            .unwrap_or(constants::DEFAULT_PROGRESS_INTERVAL)
            .max(1)
    }
}
