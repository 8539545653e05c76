//! Boundary-driven frame reassembler.
//!
//! [`FrameReassembler`] owns the bytes of the frame currently being received.
//! Payloads are appended in the order datagrams arrive; packet indices other
//! than zero are not used for ordering. The only check applied to them is a
//! diagnostic that counts indices going backwards within a frame.

use bytes::BytesMut;
use tracing::{debug, trace};

use super::CompletedFrame;
use crate::datagram::{Datagram, FrameCount, PacketIndex};

/// Synchronisation state of a [`FrameReassembler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReassemblyState {
    /// No frame start observed yet. Payloads collected here are never emitted.
    AwaitingSync,
    /// At least one frame start observed.
    Accumulating,
}

/// Result of feeding one datagram to [`FrameReassembler::ingest_datagram`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The datagram was too short to carry a payload and was ignored.
    Discarded,
    /// The payload extended the current frame.
    Appended,
    /// The datagram opened a new frame.
    FrameStarted {
        /// Counter of the frame that just started.
        frame_count: FrameCount,
        /// The previous frame, unless this was the first frame start.
        completed: Option<CompletedFrame>,
    },
}

impl IngestOutcome {
    /// Discard the frame-start detail, keeping only the emitted frame.
    #[must_use]
    pub fn into_completed(self) -> Option<CompletedFrame> {
        match self {
            Self::FrameStarted { completed, .. } => completed,
            Self::Discarded | Self::Appended => None,
        }
    }
}

/// Stateful reassembler turning datagrams into complete frames.
///
/// # Examples
///
/// ```
/// use wifiscope::{
///     datagram::{DatagramHeader, FrameCount, PacketIndex},
///     reassembly::FrameReassembler,
/// };
///
/// fn datagram(frame: u16, index: u8, payload: &[u8]) -> Vec<u8> {
///     let mut raw = DatagramHeader::new(FrameCount::new(frame), PacketIndex::new(index))
///         .encode()
///         .to_vec();
///     raw.extend_from_slice(payload);
///     raw
/// }
///
/// let mut reassembler = FrameReassembler::new();
/// assert!(reassembler.ingest(&datagram(1, 0, b"AA")).is_none());
/// assert!(reassembler.ingest(&datagram(1, 1, b"BB")).is_none());
/// let frame = reassembler
///     .ingest(&datagram(2, 0, b"CC"))
///     .expect("second frame start emits the first frame");
/// assert_eq!(frame.payload(), b"AABB");
/// assert_eq!(reassembler.buffered(), b"CC");
/// ```
#[derive(Debug)]
pub struct FrameReassembler {
    state: ReassemblyState,
    buffer: BytesMut,
    last_frame_count: Option<FrameCount>,
    last_packet_index: Option<PacketIndex>,
    datagrams_in_frame: usize,
    out_of_order_indices: u64,
}

impl Default for FrameReassembler {
    fn default() -> Self { Self::new() }
}

impl FrameReassembler {
    /// Create a reassembler waiting for its first frame start.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ReassemblyState::AwaitingSync,
            buffer: BytesMut::new(),
            last_frame_count: None,
            last_packet_index: None,
            datagrams_in_frame: 0,
            out_of_order_indices: 0,
        }
    }

    /// Feed one datagram, returning the previous frame when this datagram
    /// starts a new one.
    pub fn ingest(&mut self, datagram: &[u8]) -> Option<CompletedFrame> {
        self.ingest_datagram(datagram).into_completed()
    }

    /// Feed one datagram and report what happened to it.
    ///
    /// Datagrams of eight bytes or fewer leave the reassembler untouched.
    /// A frame-start datagram emits the accumulated buffer (once synchronised)
    /// and then begins a new buffer with its own payload.
    pub fn ingest_datagram(&mut self, raw: &[u8]) -> IngestOutcome {
        let Some(datagram) = Datagram::parse(raw) else {
            trace!(len = raw.len(), "discarding datagram without payload");
            return IngestOutcome::Discarded;
        };
        let header = datagram.header();

        if header.is_frame_start() {
            let completed = self.start_frame(header.frame_count());
            self.append(header.packet_index(), datagram.payload());
            return IngestOutcome::FrameStarted {
                frame_count: header.frame_count(),
                completed,
            };
        }

        self.note_index(header.packet_index());
        self.append(header.packet_index(), datagram.payload());
        IngestOutcome::Appended
    }

    /// Current synchronisation state.
    #[must_use]
    pub const fn state(&self) -> ReassemblyState { self.state }

    /// Counter of the most recently started frame.
    #[must_use]
    pub const fn last_frame_count(&self) -> Option<FrameCount> { self.last_frame_count }

    /// Bytes collected for the frame in progress.
    #[must_use]
    pub fn buffered(&self) -> &[u8] { &self.buffer }

    /// Number of bytes collected for the frame in progress.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.buffer.len() }

    /// Number of datagrams seen whose packet index went backwards within a
    /// frame.
    #[must_use]
    pub const fn out_of_order_indices(&self) -> u64 { self.out_of_order_indices }

    fn start_frame(&mut self, frame_count: FrameCount) -> Option<CompletedFrame> {
        let completed = match (self.state, self.last_frame_count) {
            (ReassemblyState::Accumulating, Some(previous)) => Some(CompletedFrame::new(
                previous,
                self.datagrams_in_frame,
                self.buffer.split().freeze(),
            )),
            _ => {
                self.buffer.clear();
                None
            }
        };

        self.state = ReassemblyState::Accumulating;
        self.last_frame_count = Some(frame_count);
        self.last_packet_index = None;
        self.datagrams_in_frame = 0;
        completed
    }

    fn note_index(&mut self, index: PacketIndex) {
        if let Some(previous) = self.last_packet_index
            && index < previous
        {
            self.out_of_order_indices += 1;
            debug!(
                frame_count = ?self.last_frame_count.map(FrameCount::get),
                previous = previous.get(),
                index = index.get(),
                "packet index went backwards within frame"
            );
        }
    }

    fn append(&mut self, index: PacketIndex, payload: &[u8]) {
        self.buffer.extend_from_slice(payload);
        self.last_packet_index = Some(index);
        self.datagrams_in_frame += 1;
    }
}
