//! # framewire
//!
//! Coalescing outbound write path for pre-encoded protocol frames.
//!
//! Any number of producer threads enqueue frames; one background task
//! drains them in order, merges each batch into a single buffer and pushes
//! it to the transport with one write and one flush.
//!
//! ## Architecture
//!
//! - **FrameQueue**: mutex-protected FIFO, raises a wake signal on the
//!   empty → non-empty edge
//! - **Writer task**: waits on exit/wake, drains a batch under count and
//!   byte limits, writes it
//! - **Throttle**: pauses after a pass that left the queue shallow, to let
//!   the next batch grow
//!
//! ## Example
//!
//! ```ignore
//! use framewire::{FrameWriter, WriterConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> framewire::Result<()> {
//!     let stream = tokio::net::TcpStream::connect("127.0.0.1:9000").await?;
//!     let writer = FrameWriter::new(
//!         stream,
//!         WriterConfig::default().with_throttle_period(Duration::from_millis(1)),
//!     );
//!     writer.start()?;
//!
//!     writer.enqueue(header_bytes, body_bytes)?;
//!
//!     writer.shutdown().await
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod frame;
pub mod queue;
pub mod signal;
pub mod throttle;

mod stats;
mod writer;

pub use config::WriterConfig;
pub use error::{Result, WriterError};
pub use frame::Frame;
pub use stats::WriterStats;
pub use writer::{FrameWriter, WriterHandle, WriterState};
