//! Write-path counters.
//!
//! Only the writer task increments these; any thread may read a snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the writer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Frames handed to the transport.
    pub frames_written: u64,
    /// Bytes handed to the transport.
    pub bytes_written: u64,
    /// Write + flush calls issued.
    pub batches_written: u64,
    /// Throttle pauses taken.
    pub throttle_pauses: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    frames_written: AtomicU64,
    bytes_written: AtomicU64,
    batches_written: AtomicU64,
    throttle_pauses: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_batch(&self, frames: usize, bytes: usize) {
        self.frames_written.fetch_add(frames as u64, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
        self.batches_written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pause(&self) {
        self.throttle_pauses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> WriterStats {
        WriterStats {
            frames_written: self.frames_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            throttle_pauses: self.throttle_pauses.load(Ordering::Relaxed),
        }
    }
}
