//! Owned frame buffers handed to sinks.

use bytes::Bytes;

use crate::datagram::FrameCount;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// A frame emitted by the reassembler once the next frame began.
///
/// The payload is whatever arrived between two frame starts, in receipt
/// order. It is expected to be a JPEG image but nothing guarantees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedFrame {
    frame_count: FrameCount,
    datagrams: usize,
    payload: Bytes,
}

impl CompletedFrame {
    /// Construct a completed frame.
    #[must_use]
    pub fn new(frame_count: FrameCount, datagrams: usize, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_count,
            datagrams,
            payload: payload.into(),
        }
    }

    /// Counter carried by the datagram that opened this frame.
    #[must_use]
    pub const fn frame_count(&self) -> FrameCount { self.frame_count }

    /// Number of datagrams whose payloads make up the frame.
    #[must_use]
    pub const fn datagrams(&self) -> usize { self.datagrams }

    /// Borrow the reassembled bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the frame, returning its bytes.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }

    /// Length of the reassembled payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.payload.len() }

    /// Report whether no payload bytes were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.payload.is_empty() }

    /// Check for JPEG start and end markers.
    ///
    /// This is a diagnostic probe only. A frame that passes may still fail to
    /// decode.
    ///
    /// # Examples
    ///
    /// ```
    /// use wifiscope::{datagram::FrameCount, reassembly::CompletedFrame};
    /// let frame = CompletedFrame::new(FrameCount::new(1), 1, vec![0xFF, 0xD8, 0x00, 0xFF, 0xD9]);
    /// assert!(frame.has_jpeg_markers());
    /// ```
    #[must_use]
    pub fn has_jpeg_markers(&self) -> bool {
        self.payload.starts_with(&JPEG_SOI) && self.payload.ends_with(&JPEG_EOI)
    }
}
