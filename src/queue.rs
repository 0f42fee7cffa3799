//! Thread-safe FIFO of outbound frames.
//!
//! Producers push from any thread; the writer task drains. The queue owns
//! the wake [`Signal`] so that every transition of the signal happens under
//! the same lock that guards the frame count:
//!
//! - `push` sets the signal on the empty → non-empty edge only.
//! - `drain_batch` clears it when it leaves the queue empty.
//!
//! A producer can therefore never slip a frame in between "queue observed
//! empty" and "signal cleared". The closed flag lives under the same lock,
//! so a push either lands before `close` discards the queue or is rejected.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, WriterError};
use crate::frame::Frame;
use crate::signal::Signal;

/// Frames taken from the queue in one drain, plus what was left behind.
#[derive(Debug, Default)]
pub struct Drained {
    /// Frames in enqueue order.
    pub frames: Vec<Frame>,
    /// Sum of `Frame::size()` over `frames`.
    pub bytes: usize,
    /// Frames still queued right after the drain.
    pub remaining: usize,
}

#[derive(Debug, Default)]
struct Inner {
    frames: VecDeque<Frame>,
    closed: bool,
}

/// Mutex-protected frame FIFO with an edge-triggered wake signal.
#[derive(Debug, Default)]
pub struct FrameQueue {
    inner: Mutex<Inner>,
    wake: Signal,
}

impl FrameQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The deque holds plain data; a panic elsewhere cannot leave it torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a frame.
    ///
    /// Returns `true` iff the queue was empty before this call, in which
    /// case the wake signal has been raised. Fails with `ShutDown` once the
    /// queue is closed.
    pub fn push(&self, frame: Frame) -> Result<bool> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(WriterError::ShutDown);
        }
        let was_first = inner.frames.is_empty();
        inner.frames.push_back(frame);
        if was_first {
            self.wake.set();
        }
        Ok(was_first)
    }

    /// Pop frames from the head, in order, up to the given limits.
    ///
    /// `max_count` is a hard cap on the number of frames. `max_bytes` is a
    /// soft cap on their total size: frames are taken while the total stays
    /// within it, and the frame that crosses it is still taken before
    /// draining stops. `0` disables either limit. A single frame larger than
    /// `max_bytes` is always taken on its own, so the queue always makes
    /// progress.
    pub fn drain_batch(&self, max_count: usize, max_bytes: usize) -> Drained {
        let mut inner = self.lock();
        let mut drained = Drained::default();

        loop {
            if max_count > 0 && drained.frames.len() >= max_count {
                break;
            }
            if max_bytes > 0 && drained.bytes > max_bytes {
                break;
            }
            let Some(frame) = inner.frames.pop_front() else {
                break;
            };
            drained.bytes += frame.size();
            drained.frames.push(frame);
        }

        drained.remaining = inner.frames.len();
        if inner.frames.is_empty() {
            self.wake.clear();
        }
        drained
    }

    /// Number of frames currently queued.
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().frames.is_empty()
    }

    /// Reject further pushes and drop every queued frame.
    ///
    /// Returns how many frames were discarded. Idempotent.
    pub fn close(&self) -> usize {
        let mut inner = self.lock();
        inner.closed = true;
        let discarded = inner.frames.len();
        inner.frames.clear();
        self.wake.clear();
        discarded
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Signal raised while frames are waiting to be drained.
    pub fn wake_signal(&self) -> &Signal {
        &self.wake
    }
}
