//! Datagram header model for the microscope video channel.
//!
//! Every datagram on the data channel starts with an eight byte header
//! followed by a slice of compressed image data. Only two header fields carry
//! meaning: the little-endian frame counter in bytes 0–1 and the packet index
//! in byte 3. The remaining bytes are reserved and skipped.

pub mod frame_count;
pub mod header;
pub mod packet_index;

pub use frame_count::FrameCount;
pub use header::{Datagram, DatagramHeader, HEADER_LEN};
pub use packet_index::PacketIndex;
