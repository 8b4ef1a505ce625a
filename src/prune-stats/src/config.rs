//! Stats configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Tuning for the directory walk, read from the `[stats]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Directories read at the same time.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Attempts per read when the process runs out of file descriptors.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_min_wait_ms")]
    pub retry_min_wait_ms: u64,
    #[serde(default = "default_retry_max_jitter_ms")]
    pub retry_max_jitter_ms: u64,
}

fn default_max_concurrency() -> usize {
    num_cpus::get() * 64
}

fn default_retry_attempts() -> u32 {
    1000
}

fn default_retry_min_wait_ms() -> u64 {
    200
}

fn default_retry_max_jitter_ms() -> u64 {
    2000
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            retry_attempts: default_retry_attempts(),
            retry_min_wait_ms: default_retry_min_wait_ms(),
            retry_max_jitter_ms: default_retry_max_jitter_ms(),
        }
    }
}

impl StatsConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            min_wait: Duration::from_millis(self.retry_min_wait_ms),
            max_jitter: Duration::from_millis(self.retry_max_jitter_ms),
        }
    }

    /// Concurrency limit, never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_table_uses_defaults() {
        let config: StatsConfig = serde_json::from_str(r#"{"max_concurrency": 8}"#).unwrap();
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.retry_attempts, 1000);
        assert_eq!(config.retry_policy().min_wait, Duration::from_millis(200));
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let config = StatsConfig {
            max_concurrency: 0,
            retry_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.retry_policy().max_attempts, 1);
    }
}
