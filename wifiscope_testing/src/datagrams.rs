//! Builders for raw data-channel datagrams.

use wifiscope::datagram::{DatagramHeader, FrameCount, PacketIndex};

/// Build one datagram with the given header fields and payload.
#[must_use]
pub fn datagram(frame_count: u16, packet_index: u8, payload: &[u8]) -> Vec<u8> {
    let header = DatagramHeader::new(FrameCount::new(frame_count), PacketIndex::new(packet_index));
    let mut raw = header.encode().to_vec();
    raw.extend_from_slice(payload);
    raw
}

/// Split `payload` into datagrams of at most `chunk` payload bytes, numbered
/// from packet index zero.
///
/// # Panics
///
/// Panics if `chunk` is zero or the payload needs more than 256 datagrams.
#[must_use]
pub fn frame_datagrams(frame_count: u16, payload: &[u8], chunk: usize) -> Vec<Vec<u8>> {
    assert!(chunk > 0, "chunk size must be non-zero");
    payload
        .chunks(chunk)
        .enumerate()
        .map(|(index, part)| {
            let index = u8::try_from(index).expect("frame needs more than 256 datagrams");
            datagram(frame_count, index, part)
        })
        .collect()
}

/// A small payload framed by JPEG start and end markers.
#[must_use]
pub fn jpeg_payload(fill: u8, len: usize) -> Vec<u8> {
    let mut payload = vec![0xFF, 0xD8];
    payload.extend(std::iter::repeat_n(fill, len));
    payload.extend_from_slice(&[0xFF, 0xD9]);
    payload
}
