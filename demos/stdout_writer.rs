//! Stdout writer - several producer threads sharing one writer.
//!
//! This example demonstrates:
//! - Building a `FrameWriter` over any `AsyncWrite` (here: stdout)
//! - Enqueueing length-prefixed frames from plain OS threads
//! - Reading the write-path counters before shutting down
//!
//! ```text
//! cargo run --example stdout_writer > frames.bin
//! ```

use std::time::Duration;

use framewire::{FrameWriter, WriterConfig};

const PRODUCERS: u8 = 4;
const FRAMES_PER_PRODUCER: u32 = 100;
const TOTAL_FRAMES: u64 = PRODUCERS as u64 * FRAMES_PER_PRODUCER as u64;

#[tokio::main]
async fn main() -> framewire::Result<()> {
    let config = WriterConfig::default()
        .with_throttle_period(Duration::from_millis(2))
        .with_max_batch_count(32);
    let writer = FrameWriter::new(tokio::io::stdout(), config);
    writer.start()?;

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|id| {
            let handle = writer.handle();
            std::thread::spawn(move || -> framewire::Result<()> {
                for seq in 0..FRAMES_PER_PRODUCER {
                    let body = format!("producer {} message {}\n", id, seq);
                    let header = (body.len() as u32).to_be_bytes();
                    handle.enqueue(header.to_vec(), body.into_bytes())?;
                }
                Ok(())
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer thread panicked")?;
    }

    // Counters move only after a batch is written and flushed.
    while writer.stats().frames_written < TOTAL_FRAMES {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let stats = writer.stats();
    eprintln!(
        "wrote {} frames ({} bytes) in {} batches, {} throttle pauses",
        stats.frames_written, stats.bytes_written, stats.batches_written, stats.throttle_pauses
    );

    writer.shutdown().await
}
