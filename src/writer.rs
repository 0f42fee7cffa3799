//! Dedicated writer task for coalesced frame sending.
//!
//! Producers on any thread push pre-encoded frames into a shared queue; a
//! single background task drains it, merges each batch into one buffer and
//! hands it to the transport with one write and one flush.
//!
//! # Architecture
//!
//! ```text
//! Producer 1 ─┐
//! Producer 2 ─┼─► FrameQueue ──wake──► Writer Task ─► write + flush ─► Transport
//! Producer N ─┘                          ▲
//!                             exit ──────┘
//! ```
//!
//! Only the writer task touches the transport, so bytes leave in exactly
//! the order frames were enqueued.
//!
//! # Example
//!
//! ```
//! use framewire::{FrameWriter, WriterConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> framewire::Result<()> {
//! let (client, _server) = tokio::io::duplex(4096);
//! let writer = FrameWriter::new(client, WriterConfig::default());
//! writer.start()?;
//!
//! writer.enqueue(&b"\x01\x02"[..], &b"payload"[..])?;
//!
//! writer.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::batch::{self, Batch};
use crate::config::WriterConfig;
use crate::error::{Result, WriterError};
use crate::frame::Frame;
use crate::queue::FrameQueue;
use crate::signal::Signal;
use crate::stats::{StatsCounters, WriterStats};
use crate::throttle::ThrottleController;

/// Observable state of the writer loop.
///
/// A new writer reports `Running` even before `start()`. `Stopped` is
/// terminal: reached on shutdown or after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Running,
    Stopped,
}

/// State shared between producers and the writer task.
#[derive(Debug)]
struct Shared {
    queue: FrameQueue,
    exit: Signal,
    stats: StatsCounters,
    state: watch::Sender<WriterState>,
}

impl Shared {
    fn new() -> Self {
        let (state, _) = watch::channel(WriterState::Running);
        Self {
            queue: FrameQueue::new(),
            exit: Signal::new(),
            stats: StatsCounters::default(),
            state,
        }
    }

    fn enqueue(&self, frame: Frame) -> Result<()> {
        self.queue.push(frame).map(|_| ())
    }
}

/// Moves the state to `Stopped` when the writer task ends, even by panic.
struct StoppedGuard(Arc<Shared>);

impl Drop for StoppedGuard {
    fn drop(&mut self) {
        self.0.state.send_replace(WriterState::Stopped);
    }
}

enum Lifecycle<W> {
    /// Constructed; transport waiting for `start()`.
    Idle(W),
    Started(JoinHandle<Result<()>>),
    ShutDown,
}

/// Handle for enqueueing frames from any thread.
///
/// This is cheaply cloneable and can be shared across producers.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    shared: Arc<Shared>,
}

impl WriterHandle {
    /// Enqueue one pre-encoded frame. Never waits on I/O.
    pub fn enqueue(&self, header: impl Into<Bytes>, body: impl Into<Bytes>) -> Result<()> {
        self.shared.enqueue(Frame::new(header, body))
    }

    pub fn enqueue_frame(&self, frame: Frame) -> Result<()> {
        self.shared.enqueue(frame)
    }

    /// Frames waiting to be written.
    #[inline]
    pub fn pending_frames(&self) -> usize {
        self.shared.queue.len()
    }
}

/// Outbound write path over a single transport.
///
/// Frames may be enqueued before `start()`; they are written once the
/// task runs. `shutdown()` stops the task and abandons whatever is still
/// queued.
pub struct FrameWriter<W> {
    shared: Arc<Shared>,
    config: WriterConfig,
    lifecycle: Mutex<Lifecycle<W>>,
}

impl<W> FrameWriter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Create a writer over `transport`. Nothing runs until `start()`.
    pub fn new(transport: W, config: WriterConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            config,
            lifecycle: Mutex::new(Lifecycle::Idle(transport)),
        }
    }

    /// Create a writer with default configuration.
    pub fn with_defaults(transport: W) -> Self {
        Self::new(transport, WriterConfig::default())
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle<W>> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the writer task on the current tokio runtime.
    ///
    /// Fails with `ShutDown` after `shutdown()` and with `AlreadyStarted`
    /// on a second call.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle();
        match std::mem::replace(&mut *lifecycle, Lifecycle::ShutDown) {
            Lifecycle::Idle(transport) => {
                let shared = self.shared.clone();
                let config = self.config.clone();
                tracing::debug!(
                    max_batch_count = config.max_batch_count,
                    max_batch_bytes = config.max_batch_bytes,
                    throttle_period = ?config.throttle_period,
                    "Starting writer task"
                );
                let task = tokio::spawn(async move {
                    let _guard = StoppedGuard(shared.clone());
                    let result = writer_loop(&shared, transport, &config).await;
                    if let Err(e) = &result {
                        tracing::error!("Writer loop error: {}", e);
                    }
                    result
                });
                *lifecycle = Lifecycle::Started(task);
                Ok(())
            }
            started @ Lifecycle::Started(_) => {
                *lifecycle = started;
                Err(WriterError::AlreadyStarted)
            }
            Lifecycle::ShutDown => Err(WriterError::ShutDown),
        }
    }

    /// Enqueue one pre-encoded frame.
    ///
    /// Only fails after `shutdown()`. Transport failures never surface here;
    /// watch [`FrameWriter::state`] or [`FrameWriter::closed`] for those.
    pub fn enqueue(&self, header: impl Into<Bytes>, body: impl Into<Bytes>) -> Result<()> {
        self.shared.enqueue(Frame::new(header, body))
    }

    pub fn enqueue_frame(&self, frame: Frame) -> Result<()> {
        self.shared.enqueue(frame)
    }

    /// Cloneable producer handle sharing this writer's queue.
    pub fn handle(&self) -> WriterHandle {
        WriterHandle {
            shared: self.shared.clone(),
        }
    }

    /// Stop the writer task and wait for it to finish.
    ///
    /// Idempotent: later calls return `Ok(())` at once. Frames still queued
    /// once the task has stopped are discarded, not flushed, and the queue
    /// rejects every later enqueue. The first call returns the transport
    /// error that ended the task, if any. A panic inside the task is
    /// re-raised here.
    pub async fn shutdown(&self) -> Result<()> {
        self.shared.exit.set();

        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::ShutDown);
        let result = match previous {
            Lifecycle::ShutDown => return Ok(()),
            Lifecycle::Idle(_transport) => Ok(()),
            Lifecycle::Started(task) => match task.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => {
                    tracing::warn!("Writer task cancelled: {}", e);
                    Ok(())
                }
            },
        };

        let discarded = self.shared.queue.close();
        if discarded > 0 {
            tracing::debug!(discarded, "Discarded queued frames on shutdown");
        }
        self.shared.state.send_replace(WriterState::Stopped);
        tracing::debug!("Writer shut down");
        result
    }

    /// Current state of the writer loop.
    pub fn state(&self) -> WriterState {
        *self.shared.state.borrow()
    }

    /// Resolve once the writer loop has stopped, for any reason.
    ///
    /// Resolves at once if the writer was never started or is shutting down.
    pub async fn closed(&self) {
        let started = matches!(*self.lifecycle(), Lifecycle::Started(_));
        if !started {
            return;
        }
        let mut rx = self.shared.state.subscribe();
        let _ = rx.wait_for(|state| *state == WriterState::Stopped).await;
    }

    /// Frames waiting to be written.
    #[inline]
    pub fn pending_frames(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn stats(&self) -> WriterStats {
        self.shared.stats.snapshot()
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

impl<W> Drop for FrameWriter<W> {
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(lifecycle, Lifecycle::Started(_)) {
            tracing::warn!("FrameWriter dropped without shutdown; signalling writer task to exit");
            self.shared.exit.set();
        }
        self.shared.queue.close();
    }
}

impl<W> std::fmt::Debug for FrameWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("config", &self.config)
            .field("state", &*self.shared.state.borrow())
            .field("pending_frames", &self.shared.queue.len())
            .finish()
    }
}

/// Main writer loop: wait for frames or exit, write, maybe pause.
///
/// Exit wins when both signals are ready.
async fn writer_loop<W>(shared: &Shared, mut transport: W, config: &WriterConfig) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let throttle = ThrottleController::from_config(config);
    let wake = shared.queue.wake_signal();

    loop {
        tokio::select! {
            biased;
            _ = shared.exit.wait() => break,
            _ = wake.wait() => {}
        }

        let residual = write_pass(shared, &mut transport, config).await?;

        if let Some(pause) = throttle.pause_for(residual) {
            shared.stats.record_pause();
            tracing::trace!(residual, ?pause, "Throttling writer");
            tokio::select! {
                biased;
                _ = shared.exit.wait() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    tracing::debug!("Writer task exiting");
    Ok(())
}

/// Drain one batch, write it, and return the residual queue depth.
///
/// The residual counts the batch just taken as one extra entry, so it
/// reflects the depth at the moment the batch was removed.
async fn write_pass<W>(shared: &Shared, transport: &mut W, config: &WriterConfig) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let drained = shared
        .queue
        .drain_batch(config.max_batch_count, config.max_batch_bytes);
    let residual = drained.remaining + 1;

    if let Some(batch) = batch::assemble(&drained.frames) {
        if !batch.is_empty() {
            write_batch(transport, &batch).await?;
            shared.stats.record_batch(batch.frames, batch.len());
        }
        tracing::trace!(
            frames = batch.frames,
            bytes = batch.len(),
            remaining = drained.remaining,
            "Wrote batch"
        );
    }

    Ok(residual)
}

/// One write of the merged buffer followed by one flush.
async fn write_batch<W>(transport: &mut W, batch: &Batch) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    transport.write_all(&batch.bytes).await?;
    transport.flush().await?;
    Ok(())
}
