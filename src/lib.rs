#![doc(html_root_url = "https://docs.rs/wifiscope/latest")]
//! Public API for the `wifiscope` library.
//!
//! This crate receives the UDP video stream of a Wi-Fi microscope,
//! reassembles datagrams into complete JPEG frames, and keeps the device
//! streaming with periodic heartbeat commands.

pub mod byte_order;
pub mod command;
pub mod config;
pub mod datagram;
pub mod error;
pub mod heartbeat;
pub mod metrics;
pub mod reassembly;
pub mod session;
pub mod sink;

pub use command::{Command, CommandTransport, UdpCommandChannel};
pub use config::{ConfigError, StreamConfig};
pub use datagram::{Datagram, DatagramHeader, FrameCount, HEADER_LEN, PacketIndex};
pub use error::{Result, SessionError};
pub use heartbeat::{HeartbeatEmitter, HeartbeatSchedule};
pub use reassembly::{CompletedFrame, FrameReassembler, IngestOutcome, ReassemblyState};
pub use session::{SessionReport, StreamSession};
pub use sink::{DirectorySink, FrameSink, LogSink, SinkError};
