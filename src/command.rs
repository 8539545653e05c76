//! Command channel to the microscope.
//!
//! Commands are fire-and-forget UDP datagrams made of the ASCII magic
//! `JHCMD` followed by a two byte opcode. The device sends no replies on this
//! channel.

use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::trace;

/// Commands understood by the microscope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// First step of the start-up handshake.
    InitPrimary,
    /// Second step of the start-up handshake.
    InitSecondary,
    /// Keepalive that starts and sustains the video stream.
    Heartbeat,
    /// Ask the device to stop streaming.
    Stop,
}

impl Command {
    /// Prefix shared by every command datagram.
    pub const MAGIC: &'static [u8; 5] = b"JHCMD";

    /// Length of an encoded command.
    pub const ENCODED_LEN: usize = 7;

    /// Opcode bytes following [`Command::MAGIC`].
    #[must_use]
    pub const fn opcode(self) -> [u8; 2] {
        match self {
            Self::InitPrimary => [0x10, 0x00],
            Self::InitSecondary => [0x20, 0x00],
            Self::Heartbeat => [0xD0, 0x01],
            Self::Stop => [0xD0, 0x02],
        }
    }

    /// Encode the command as sent on the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use wifiscope::command::Command;
    /// assert_eq!(&Command::Heartbeat.encode(), b"JHCMD\xd0\x01");
    /// ```
    #[must_use]
    pub fn encode(self) -> [u8; Self::ENCODED_LEN] {
        let mut bytes = [0_u8; Self::ENCODED_LEN];
        bytes[..Self::MAGIC.len()].copy_from_slice(Self::MAGIC);
        bytes[Self::MAGIC.len()..].copy_from_slice(&self.opcode());
        bytes
    }

    /// Decode a command datagram, returning `None` for unknown bytes.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let opcode = bytes.strip_prefix(Self::MAGIC.as_slice())?;
        [
            Self::InitPrimary,
            Self::InitSecondary,
            Self::Heartbeat,
            Self::Stop,
        ]
        .into_iter()
        .find(|command| command.opcode().as_slice() == opcode)
    }

    /// Commands sent before the stream is awaited: the two init steps
    /// followed by two warm-up heartbeats.
    pub const STARTUP: [Self; 4] = [
        Self::InitPrimary,
        Self::InitSecondary,
        Self::Heartbeat,
        Self::Heartbeat,
    ];

    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitPrimary => "init_primary",
            Self::InitSecondary => "init_secondary",
            Self::Heartbeat => "heartbeat",
            Self::Stop => "stop",
        }
    }
}

/// Abstraction over the outbound command channel.
///
/// Implementations must not wait for a reply; a send either hands the bytes
/// to the transport or fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Transmit one command to the device.
    async fn send(&self, command: Command) -> io::Result<()>;
}

/// UDP command channel bound to an ephemeral local port.
#[derive(Debug)]
pub struct UdpCommandChannel {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpCommandChannel {
    /// Bind an ephemeral socket of the same address family as `remote`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the local socket cannot be bound.
    pub async fn bind(remote: SocketAddr) -> io::Result<Self> {
        let local = match remote {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        let socket = UdpSocket::bind(local).await?;
        Ok(Self { socket, remote })
    }

    /// Device endpoint commands are sent to.
    #[must_use]
    pub const fn remote(&self) -> SocketAddr { self.remote }

    /// Local address of the command socket.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the socket address cannot be queried.
    pub fn local_addr(&self) -> io::Result<SocketAddr> { self.socket.local_addr() }
}

#[async_trait]
impl CommandTransport for UdpCommandChannel {
    async fn send(&self, command: Command) -> io::Result<()> {
        let bytes = command.encode();
        let written = self.socket.send_to(&bytes, self.remote).await?;
        trace!(command = command.as_str(), written, remote = %self.remote, "command sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tokio::net::UdpSocket;

    use super::{Command, CommandTransport, UdpCommandChannel};

    #[rstest]
    #[case::init_primary(Command::InitPrimary, *b"JHCMD\x10\x00")]
    #[case::init_secondary(Command::InitSecondary, *b"JHCMD\x20\x00")]
    #[case::heartbeat(Command::Heartbeat, *b"JHCMD\xd0\x01")]
    #[case::stop(Command::Stop, *b"JHCMD\xd0\x02")]
    fn commands_encode_to_device_bytes(#[case] command: Command, #[case] wire: [u8; 7]) {
        assert_eq!(command.encode(), wire);
        assert_eq!(Command::decode(&wire), Some(command));
    }

    #[rstest]
    #[case::wrong_magic(b"XHCMD\xd0\x01".as_slice())]
    #[case::unknown_opcode(b"JHCMD\xd0\x03".as_slice())]
    #[case::truncated(b"JHCMD\xd0".as_slice())]
    fn unknown_command_bytes_do_not_decode(#[case] bytes: &[u8]) {
        assert_eq!(Command::decode(bytes), None);
    }

    #[tokio::test]
    async fn udp_channel_delivers_encoded_command() {
        let device = UdpSocket::bind("127.0.0.1:0").await.expect("bind device");
        let remote = device.local_addr().expect("device addr");
        let channel = UdpCommandChannel::bind(remote).await.expect("bind channel");

        channel.send(Command::Stop).await.expect("send stop");

        let mut buf = [0_u8; 16];
        let (len, from) = device.recv_from(&mut buf).await.expect("receive command");
        assert_eq!(&buf[..len], b"JHCMD\xd0\x02");
        assert_eq!(from.port(), channel.local_addr().expect("local addr").port());
    }
}
