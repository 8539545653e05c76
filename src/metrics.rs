//! Metric helpers for `wifiscope`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. Without the
//! `metrics` feature the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking received datagrams.
pub const DATAGRAMS_TOTAL: &str = "wifiscope_datagrams_total";
/// Name of the counter tracking completed frames.
pub const FRAMES_TOTAL: &str = "wifiscope_frames_total";
/// Name of the counter tracking heartbeat transmissions.
pub const HEARTBEATS_TOTAL: &str = "wifiscope_heartbeats_total";
/// Name of the counter tracking receive timeouts.
pub const RECV_TIMEOUTS_TOTAL: &str = "wifiscope_recv_timeouts_total";
/// Name of the counter tracking failed receives.
pub const RECV_ERRORS_TOTAL: &str = "wifiscope_recv_errors_total";

/// What happened to a received datagram.
#[derive(Clone, Copy, Debug)]
pub enum DatagramOutcome {
    /// Appended to the frame in progress.
    Accepted,
    /// Too short to carry a payload.
    Discarded,
}

impl DatagramOutcome {
    #[cfg(feature = "metrics")]
    fn as_str(self) -> &'static str {
        match self {
            DatagramOutcome::Accepted => "accepted",
            DatagramOutcome::Discarded => "discarded",
        }
    }
}

/// What happened to a completed frame.
#[derive(Clone, Copy, Debug)]
pub enum FrameOutcome {
    /// Handed to the sink queue.
    Delivered,
    /// Dropped because the sink queue was full.
    Dropped,
}

impl FrameOutcome {
    #[cfg(feature = "metrics")]
    fn as_str(self) -> &'static str {
        match self {
            FrameOutcome::Delivered => "delivered",
            FrameOutcome::Dropped => "dropped",
        }
    }
}

/// Record a received datagram.
pub fn inc_datagrams(outcome: DatagramOutcome) {
    #[cfg(feature = "metrics")]
    counter!(DATAGRAMS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}

/// Record a completed frame.
pub fn inc_frames(outcome: FrameOutcome) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_TOTAL, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}

/// Record a heartbeat attempt.
pub fn inc_heartbeats(sent: bool) {
    #[cfg(feature = "metrics")]
    counter!(HEARTBEATS_TOTAL, "outcome" => if sent { "sent" } else { "failed" }).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = sent;
}

/// Record a receive that timed out without data.
pub fn inc_recv_timeouts() {
    #[cfg(feature = "metrics")]
    counter!(RECV_TIMEOUTS_TOTAL).increment(1);
}

/// Record a receive that failed with a socket error.
pub fn inc_recv_errors() {
    #[cfg(feature = "metrics")]
    counter!(RECV_ERRORS_TOTAL).increment(1);
}
