//! Parsing and encoding of the eight byte datagram header.

use super::{FrameCount, PacketIndex};
use crate::byte_order::{read_le_u16, write_le_u16};

/// Length of the header preceding every datagram payload.
pub const HEADER_LEN: usize = 8;

const PACKET_INDEX_OFFSET: usize = 3;

/// Header fields decoded from the front of a data channel datagram.
///
/// # Examples
///
/// ```
/// use wifiscope::datagram::{DatagramHeader, FrameCount, PacketIndex};
/// let header = DatagramHeader::new(FrameCount::new(0x0102), PacketIndex::new(4));
/// let bytes = header.encode();
/// assert_eq!(bytes, [0x02, 0x01, 0, 4, 0, 0, 0, 0]);
/// assert_eq!(DatagramHeader::decode(bytes), header);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DatagramHeader {
    frame_count: FrameCount,
    packet_index: PacketIndex,
}

impl DatagramHeader {
    /// Create a header from its two meaningful fields.
    #[must_use]
    pub const fn new(frame_count: FrameCount, packet_index: PacketIndex) -> Self {
        Self {
            frame_count,
            packet_index,
        }
    }

    /// Decode the header from its raw bytes, ignoring reserved positions.
    #[must_use]
    pub fn decode(bytes: [u8; HEADER_LEN]) -> Self {
        Self {
            frame_count: FrameCount::new(read_le_u16([bytes[0], bytes[1]])),
            packet_index: PacketIndex::new(bytes[PACKET_INDEX_OFFSET]),
        }
    }

    /// Encode the header, leaving reserved bytes zeroed.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0_u8; HEADER_LEN];
        bytes[..2].copy_from_slice(&write_le_u16(self.frame_count.get()));
        bytes[PACKET_INDEX_OFFSET] = self.packet_index.get();
        bytes
    }

    /// Frame this datagram belongs to.
    #[must_use]
    pub const fn frame_count(&self) -> FrameCount { self.frame_count }

    /// Position of this datagram within its frame.
    #[must_use]
    pub const fn packet_index(&self) -> PacketIndex { self.packet_index }

    /// Report whether the datagram opens a new frame.
    #[must_use]
    pub const fn is_frame_start(&self) -> bool { self.packet_index.is_frame_start() }
}

/// A parsed datagram borrowing its payload from the receive buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datagram<'a> {
    header: DatagramHeader,
    payload: &'a [u8],
}

impl<'a> Datagram<'a> {
    /// Split a raw datagram into header and payload.
    ///
    /// Returns `None` when the datagram carries no payload byte past the
    /// header. Such datagrams are treated as noise.
    ///
    /// # Examples
    ///
    /// ```
    /// use wifiscope::datagram::Datagram;
    /// assert!(Datagram::parse(&[0_u8; 8]).is_none());
    /// let parsed = Datagram::parse(&[1, 0, 0, 0, 0, 0, 0, 0, 0xAA]).expect("payload present");
    /// assert_eq!(parsed.header().frame_count().get(), 1);
    /// assert_eq!(parsed.payload(), &[0xAA]);
    /// ```
    #[must_use]
    pub fn parse(raw: &'a [u8]) -> Option<Self> {
        if raw.len() <= HEADER_LEN {
            return None;
        }
        let (head, payload) = raw.split_at(HEADER_LEN);
        let head: [u8; HEADER_LEN] = head.try_into().ok()?;
        Some(Self {
            header: DatagramHeader::decode(head),
            payload,
        })
    }

    /// Decoded header fields.
    #[must_use]
    pub const fn header(&self) -> DatagramHeader { self.header }

    /// Image bytes following the header.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }
}
