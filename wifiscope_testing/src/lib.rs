//! Test doubles for driving `wifiscope` sessions without hardware.
//!
//! [`FakeMicroscope`] plays the device's video side over loopback UDP,
//! [`RecordingCommands`] stands in for the command channel, and
//! [`ChannelSink`] forwards completed frames to the test.
//!
//! ```rust
//! use wifiscope_testing::{datagram, frame_datagrams};
//!
//! let raw = datagram(3, 0, b"jpeg");
//! assert_eq!(raw.len(), 12);
//! assert_eq!(frame_datagrams(1, b"abcdef", 4).len(), 2);
//! ```

pub mod commands;
pub mod datagrams;
pub mod device;
pub mod sink;

pub use commands::{RecordingCommands, recording_commands};
pub use datagrams::{datagram, frame_datagrams, jpeg_payload};
pub use device::FakeMicroscope;
pub use sink::{ChannelSink, channel_sink};
