//! Stream configuration.
//!
//! [`StreamConfig`] gathers the endpoints and tunables of a streaming
//! session. Defaults match the microscope's fixed network setup: the device
//! lives at `192.168.29.1`, listens for commands on port 20000 and sends
//! video to port 10900.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU16,
    time::Duration,
};

use thiserror::Error;

use crate::heartbeat::{DEFAULT_HEARTBEAT_INTERVAL, HeartbeatSchedule};

/// Factory-assigned address of the microscope.
pub const DEFAULT_REMOTE_HOST: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 29, 1));
/// Port the microscope accepts commands on.
pub const DEFAULT_COMMAND_PORT: u16 = 20_000;
/// Port the microscope sends video datagrams to.
pub const DEFAULT_RECEIVE_PORT: u16 = 10_900;
/// How long a receive may wait before the loop checks in again.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(5);
/// Receive buffer size. Holds the largest possible UDP payload, so no
/// datagram is ever truncated.
pub const DEFAULT_MAX_DATAGRAM_LEN: usize = 65_507;
/// Completed frames that may wait for a slow sink before frames are dropped.
pub const DEFAULT_FRAME_QUEUE: usize = 8;

/// Rejected configuration values.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The heartbeat interval must be at least one frame.
    #[error("heartbeat interval must be non-zero")]
    ZeroHeartbeatInterval,
    /// The receive buffer cannot hold a header and a payload byte.
    #[error("receive buffer of {0} bytes cannot hold a datagram")]
    DatagramBufferTooSmall(usize),
    /// The receive timeout must be positive.
    #[error("receive timeout must be non-zero")]
    ZeroRecvTimeout,
}

/// Endpoints and tunables for a streaming session.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use wifiscope::config::StreamConfig;
///
/// let config = StreamConfig::default()
///     .receive_port(0)
///     .recv_timeout(Duration::from_millis(250));
/// assert_eq!(config.command_addr().port(), 20_000);
/// assert_eq!(config.recv_timeout_value(), Duration::from_millis(250));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    remote_host: IpAddr,
    command_port: u16,
    bind_host: IpAddr,
    receive_port: u16,
    recv_timeout: Duration,
    heartbeat_interval: NonZeroU16,
    max_datagram_len: usize,
    frame_queue: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            remote_host: DEFAULT_REMOTE_HOST,
            command_port: DEFAULT_COMMAND_PORT,
            bind_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            receive_port: DEFAULT_RECEIVE_PORT,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            max_datagram_len: DEFAULT_MAX_DATAGRAM_LEN,
            frame_queue: DEFAULT_FRAME_QUEUE,
        }
    }
}

impl StreamConfig {
    /// Set the device address commands are sent to.
    #[must_use]
    pub fn remote_host(mut self, host: IpAddr) -> Self {
        self.remote_host = host;
        self
    }

    /// Set the device command port.
    #[must_use]
    pub fn command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    /// Set the local address the data socket binds to.
    #[must_use]
    pub fn bind_host(mut self, host: IpAddr) -> Self {
        self.bind_host = host;
        self
    }

    /// Set the local port video datagrams arrive on. Zero picks any free port.
    #[must_use]
    pub fn receive_port(mut self, port: u16) -> Self {
        self.receive_port = port;
        self
    }

    /// Set how long a single receive may block.
    #[must_use]
    pub fn recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Set the heartbeat spacing in frames.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: NonZeroU16) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Set the receive buffer size. Longer datagrams are truncated by the
    /// socket.
    #[must_use]
    pub fn max_datagram_len(mut self, len: usize) -> Self {
        self.max_datagram_len = len;
        self
    }

    /// Set how many completed frames may queue for the sink. At least one.
    #[must_use]
    pub fn frame_queue(mut self, capacity: usize) -> Self {
        self.frame_queue = capacity.max(1);
        self
    }

    /// Device command endpoint.
    #[must_use]
    pub const fn command_addr(&self) -> SocketAddr {
        SocketAddr::new(self.remote_host, self.command_port)
    }

    /// Local address of the data socket.
    #[must_use]
    pub const fn receive_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.receive_port)
    }

    /// Configured receive timeout.
    #[must_use]
    pub const fn recv_timeout_value(&self) -> Duration { self.recv_timeout }

    /// Heartbeat cadence derived from the configured interval.
    #[must_use]
    pub const fn heartbeat_schedule(&self) -> HeartbeatSchedule {
        HeartbeatSchedule::new(self.heartbeat_interval)
    }

    /// Configured receive buffer size.
    #[must_use]
    pub const fn max_datagram_len_value(&self) -> usize { self.max_datagram_len }

    /// Configured sink queue capacity.
    #[must_use]
    pub const fn frame_queue_capacity(&self) -> usize { self.frame_queue }

    /// Check values that cannot be rejected by the setters' types.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_timeout.is_zero() {
            return Err(ConfigError::ZeroRecvTimeout);
        }
        if self.max_datagram_len <= crate::datagram::HEADER_LEN {
            return Err(ConfigError::DatagramBufferTooSmall(self.max_datagram_len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, time::Duration};

    use rstest::rstest;

    use super::{ConfigError, StreamConfig};

    #[test]
    fn defaults_match_device_network() {
        let config = StreamConfig::default();
        assert_eq!(
            config.command_addr(),
            "192.168.29.1:20000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(config.receive_addr().port(), 10_900);
        assert_eq!(config.recv_timeout_value(), Duration::from_secs(5));
        assert_eq!(config.heartbeat_schedule().interval().get(), 50);
        assert_eq!(config.max_datagram_len_value(), 65_507);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn frame_queue_is_at_least_one() {
        assert_eq!(StreamConfig::default().frame_queue(0).frame_queue_capacity(), 1);
    }

    #[rstest]
    #[case::zero_timeout(
        StreamConfig::default().recv_timeout(Duration::ZERO),
        ConfigError::ZeroRecvTimeout
    )]
    #[case::header_sized_buffer(
        StreamConfig::default().max_datagram_len(8),
        ConfigError::DatagramBufferTooSmall(8)
    )]
    fn validate_rejects_unusable_values(#[case] config: StreamConfig, #[case] expected: ConfigError) {
        assert_eq!(config.validate(), Err(expected));
    }
}
