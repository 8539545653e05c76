//! Position of a datagram payload within its frame.

use derive_more::{Display, From, Into};

/// Zero-based position of a datagram within the frame it belongs to.
///
/// Index zero marks the first datagram of a new frame; it is the only value
/// the reassembler acts upon.
///
/// # Examples
///
/// ```
/// use wifiscope::datagram::PacketIndex;
/// assert!(PacketIndex::FIRST.is_frame_start());
/// assert!(!PacketIndex::new(3).is_frame_start());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct PacketIndex(u8);

impl PacketIndex {
    /// Index carried by the first datagram of every frame.
    pub const FIRST: Self = Self(0);

    /// Construct an index from its wire value.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value) }

    /// Return the wire value.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Report whether this datagram opens a new frame.
    #[must_use]
    pub const fn is_frame_start(self) -> bool { self.0 == 0 }
}
