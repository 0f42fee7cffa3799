//! Outbound frame: a pre-encoded header/body pair.
//!
//! Frames arrive already serialized. The writer never looks inside them;
//! it only needs their bytes and their total length.
//!
//! # Example
//!
//! ```
//! use framewire::Frame;
//! use bytes::Bytes;
//!
//! let frame = Frame::new(Bytes::from_static(b"abc"), Bytes::from_static(b"xy"));
//!
//! assert_eq!(frame.size(), 5);
//! assert_eq!(frame.header(), b"abc");
//! assert_eq!(frame.body(), b"xy");
//! ```

use bytes::{BufMut, Bytes};

/// A pre-encoded frame ready to be written.
///
/// Immutable once built. Both ranges are `Bytes`, so a frame built from
/// caller-held `Bytes` shares the caller's buffer instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: Bytes,
    body: Bytes,
}

impl Frame {
    /// Create a frame from header and body bytes (zero-copy).
    #[inline]
    pub fn new(header: impl Into<Bytes>, body: impl Into<Bytes>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }

    /// Create a frame with an empty body.
    #[inline]
    pub fn header_only(header: impl Into<Bytes>) -> Self {
        Self::new(header, Bytes::new())
    }

    /// Create a frame from borrowed ranges (copies data).
    ///
    /// The caller may reuse both buffers as soon as this returns.
    pub fn copy_from_slices(header: &[u8], body: &[u8]) -> Self {
        Self {
            header: Bytes::copy_from_slice(header),
            body: Bytes::copy_from_slice(body),
        }
    }

    #[inline]
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Total size of this frame (header + body).
    #[inline]
    pub fn size(&self) -> usize {
        self.header.len() + self.body.len()
    }

    /// Append header then body to `buf`.
    #[inline]
    pub(crate) fn put_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.header);
        buf.put_slice(&self.body);
    }

    /// Split back into header and body.
    pub fn into_parts(self) -> (Bytes, Bytes) {
        (self.header, self.body)
    }
}
