//! Helpers for explicit little-endian conversions.
//!
//! The microscope transmits its frame counter least-significant byte first.
//! These helpers keep Clippy expectations scoped to the conversion points so
//! datagram code can remain explicit about wire endianness without repeating
//! lint annotations.

/// Serialise a `u16` in little-endian byte order.
///
/// # Examples
///
/// ```
/// use wifiscope::byte_order::write_le_u16;
///
/// assert_eq!(write_le_u16(0x1234), [0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "The device frame counter is little-endian on the wire."
    )]
    value.to_le_bytes()
}

/// Parse a little-endian `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use wifiscope::byte_order::read_le_u16;
///
/// assert_eq!(read_le_u16([0x34, 0x12]), 0x1234);
/// ```
#[must_use]
pub fn read_le_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "The device frame counter is little-endian on the wire."
    )]
    u16::from_le_bytes(bytes)
}
