//! Frame reassembly from the microscope's datagram stream.
//!
//! The device sends no length field and no end-of-frame marker; a frame is
//! known to be complete only when the first datagram of the next frame
//! arrives. [`FrameReassembler`] therefore emits the previous frame whenever it
//! sees a frame-start datagram and never flushes on shutdown.

pub mod completed;
pub mod reassembler;

pub use completed::CompletedFrame;
pub use reassembler::{FrameReassembler, IngestOutcome, ReassemblyState};

#[cfg(test)]
mod tests;
