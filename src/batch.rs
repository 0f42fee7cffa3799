//! Batch assembly: merge drained frames into one contiguous buffer.
//!
//! The output is the exact concatenation of every frame's header and body,
//! in drain order, so the transport sees one write per pass.

use bytes::{Bytes, BytesMut};

use crate::frame::Frame;

/// One merged write, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Number of frames merged into `bytes`.
    pub frames: usize,
    /// Concatenated frame bytes.
    pub bytes: Bytes,
}

impl Batch {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Merge `frames` into a single buffer.
///
/// Returns `None` when there is nothing to write. The buffer is allocated
/// once, sized to the sum of all frame sizes.
pub fn assemble(frames: &[Frame]) -> Option<Batch> {
    if frames.is_empty() {
        return None;
    }

    let total_size: usize = frames.iter().map(Frame::size).sum();
    let mut buf = BytesMut::with_capacity(total_size);
    for frame in frames {
        frame.put_into(&mut buf);
    }
    debug_assert_eq!(buf.len(), total_size);

    Some(Batch {
        frames: frames.len(),
        bytes: buf.freeze(),
    })
}
