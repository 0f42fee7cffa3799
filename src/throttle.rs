//! Adaptive pause between write passes.
//!
//! After a pass the writer looks at how deep the queue still is. A shallow
//! queue means light, bursty traffic: pausing lets more frames pile up so
//! the next write carries more of them. A deep queue means sustained load:
//! the writer goes straight back to draining.

use std::time::Duration;

use crate::config::WriterConfig;

/// Decides whether the writer pauses after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleController {
    period: Duration,
    min_queue_depth: usize,
}

impl ThrottleController {
    pub fn new(period: Duration, min_queue_depth: usize) -> Self {
        Self {
            period,
            min_queue_depth,
        }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.throttle_period, config.min_queue_depth_for_throttle)
    }

    /// Pause to apply for the given residual depth, if any.
    #[inline]
    pub fn pause_for(&self, residual_depth: usize) -> Option<Duration> {
        (!self.period.is_zero() && residual_depth < self.min_queue_depth).then_some(self.period)
    }
}
