//! Writer configuration.
//!
//! Limits and throttle policy for the writer loop, fixed at construction.
//!
//! # JSON form
//!
//! ```
//! use framewire::WriterConfig;
//! use std::time::Duration;
//!
//! let config = WriterConfig::from_json(
//!     r#"{ "throttle_period_ms": 2, "max_batch_count": 16 }"#,
//! ).unwrap();
//!
//! assert_eq!(config.throttle_period, Duration::from_millis(2));
//! assert_eq!(config.max_batch_count, 16);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WriterError};

/// Default pause after a light batch (disabled).
pub const DEFAULT_THROTTLE_PERIOD: Duration = Duration::ZERO;

/// Default soft cap on bytes merged into one write.
pub const DEFAULT_MAX_BATCH_BYTES: usize = 64 * 1024;

/// Default hard cap on frames merged into one write.
pub const DEFAULT_MAX_BATCH_COUNT: usize = 64;

/// Default residual depth below which the throttle pause applies.
pub const DEFAULT_MIN_QUEUE_DEPTH_FOR_THROTTLE: usize = 2;

/// Configuration for the writer task.
///
/// `0` disables `max_batch_bytes` / `max_batch_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Pause after a pass that left the queue shallow. Zero disables it.
    #[serde(rename = "throttle_period_ms", with = "duration_ms")]
    pub throttle_period: Duration,
    /// Soft cap on total bytes per write.
    pub max_batch_bytes: usize,
    /// Hard cap on frame count per write.
    pub max_batch_count: usize,
    /// Residual depth threshold for the throttle pause.
    ///
    /// The residual depth counts the batch just written as one, so it is
    /// never below 1; `2` pauses only when a pass emptied the queue.
    pub min_queue_depth_for_throttle: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            throttle_period: DEFAULT_THROTTLE_PERIOD,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            max_batch_count: DEFAULT_MAX_BATCH_COUNT,
            min_queue_depth_for_throttle: DEFAULT_MIN_QUEUE_DEPTH_FOR_THROTTLE,
        }
    }
}

impl WriterConfig {
    /// No batch limits and no throttle: every pass drains the whole queue.
    pub fn unbounded() -> Self {
        Self {
            throttle_period: Duration::ZERO,
            max_batch_bytes: 0,
            max_batch_count: 0,
            min_queue_depth_for_throttle: 0,
        }
    }

    pub fn with_throttle_period(mut self, period: Duration) -> Self {
        self.throttle_period = period;
        self
    }

    pub fn with_max_batch_bytes(mut self, bytes: usize) -> Self {
        self.max_batch_bytes = bytes;
        self
    }

    pub fn with_max_batch_count(mut self, count: usize) -> Self {
        self.max_batch_count = count;
        self
    }

    pub fn with_min_queue_depth_for_throttle(mut self, depth: usize) -> Self {
        self.min_queue_depth_for_throttle = depth;
        self
    }

    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the writer loop cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.throttle_period > Duration::from_secs(60) {
            return Err(WriterError::InvalidConfig(format!(
                "throttle_period {:?} exceeds 60s",
                self.throttle_period
            )));
        }
        Ok(())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
