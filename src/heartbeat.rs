//! Keepalive commands that keep the microscope streaming.
//!
//! The device stops transmitting unless it keeps receiving heartbeat
//! commands. [`HeartbeatSchedule`] decides when one is due based on the frame
//! counter of each newly started frame; [`HeartbeatEmitter`] sends it.

use std::{io, num::NonZeroU16};

use tracing::debug;

use crate::{
    command::{Command, CommandTransport},
    datagram::FrameCount,
};

/// Default spacing between heartbeats, in frames.
pub const DEFAULT_HEARTBEAT_INTERVAL: NonZeroU16 = match NonZeroU16::new(50) {
    Some(interval) => interval,
    None => panic!("heartbeat interval must be non-zero"),
};

/// Frame-count based heartbeat cadence.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU16;
///
/// use wifiscope::{datagram::FrameCount, heartbeat::HeartbeatSchedule};
///
/// let schedule = HeartbeatSchedule::new(NonZeroU16::new(50).expect("non-zero"));
/// assert!(schedule.is_due(FrameCount::new(100)));
/// assert!(!schedule.is_due(FrameCount::new(101)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartbeatSchedule {
    interval: NonZeroU16,
}

impl Default for HeartbeatSchedule {
    fn default() -> Self { Self::new(DEFAULT_HEARTBEAT_INTERVAL) }
}

impl HeartbeatSchedule {
    /// Fire whenever a started frame's counter is a multiple of `interval`.
    #[must_use]
    pub const fn new(interval: NonZeroU16) -> Self { Self { interval } }

    /// Configured spacing in frames.
    #[must_use]
    pub const fn interval(&self) -> NonZeroU16 { self.interval }

    /// Report whether a heartbeat is due for a frame that just started.
    #[must_use]
    pub const fn is_due(&self, frame_count: FrameCount) -> bool {
        frame_count.is_multiple_of(self.interval.get())
    }
}

/// Sends heartbeat commands over a borrowed command transport.
#[derive(Debug)]
pub struct HeartbeatEmitter<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T> HeartbeatEmitter<'a, T>
where
    T: CommandTransport + ?Sized,
{
    /// Wrap the command transport heartbeats are sent on.
    #[must_use]
    pub const fn new(transport: &'a T) -> Self { Self { transport } }

    /// Transmit one heartbeat.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`io::Error`]. Callers are expected to log it
    /// and carry on; the device tolerates missed heartbeats.
    pub async fn send_heartbeat(&self) -> io::Result<()> {
        self.transport.send(Command::Heartbeat).await?;
        debug!("heartbeat sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{io, num::NonZeroU16};

    use rstest::rstest;

    use super::{HeartbeatEmitter, HeartbeatSchedule};
    use crate::{
        command::{Command, MockCommandTransport},
        datagram::FrameCount,
    };

    fn schedule(interval: u16) -> HeartbeatSchedule {
        HeartbeatSchedule::new(NonZeroU16::new(interval).expect("non-zero interval"))
    }

    #[test]
    fn default_cadence_is_every_fifty_frames() {
        assert_eq!(HeartbeatSchedule::default().interval().get(), 50);
    }

    #[rstest]
    #[case(50)]
    #[case(7)]
    #[case(1)]
    fn fires_exactly_on_multiples_of_interval(#[case] interval: u16) {
        let schedule = schedule(interval);
        let fired: Vec<u16> = (0..=200)
            .filter(|count| schedule.is_due(FrameCount::new(*count)))
            .collect();
        let expected: Vec<u16> = (0..=200).filter(|count| count % interval == 0).collect();
        assert_eq!(fired, expected);
        assert!(schedule.is_due(FrameCount::new(0)));
    }

    #[tokio::test]
    async fn emitter_sends_heartbeat_command() {
        let mut transport = MockCommandTransport::new();
        transport
            .expect_send()
            .withf(|command| *command == Command::Heartbeat)
            .times(1)
            .returning(|_| Ok(()));

        HeartbeatEmitter::new(&transport)
            .send_heartbeat()
            .await
            .expect("heartbeat should be sent");
    }

    #[tokio::test]
    async fn emitter_reports_transport_failure() {
        let mut transport = MockCommandTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(io::Error::from(io::ErrorKind::NetworkUnreachable)));

        let err = HeartbeatEmitter::new(&transport)
            .send_heartbeat()
            .await
            .expect_err("failure must be surfaced");
        assert_eq!(err.kind(), io::ErrorKind::NetworkUnreachable);
    }
}
