//! Loopback stand-in for the microscope's video transmitter.

use std::{io, net::SocketAddr};

use tokio::net::UdpSocket;

use crate::frame_datagrams;

/// Sends data-channel datagrams to a session's receive socket.
#[derive(Debug)]
pub struct FakeMicroscope {
    socket: UdpSocket,
    target: SocketAddr,
}

impl FakeMicroscope {
    /// Bind a loopback socket that transmits to `target`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the socket cannot be bound.
    pub async fn bind(target: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        Ok(Self { socket, target })
    }

    /// Send one raw datagram.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the datagram cannot be sent.
    pub async fn send(&self, raw: &[u8]) -> io::Result<()> {
        self.socket.send_to(raw, self.target).await?;
        Ok(())
    }

    /// Send a whole frame split into `chunk`-sized payloads.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if any datagram cannot be sent.
    pub async fn send_frame(&self, frame_count: u16, payload: &[u8], chunk: usize) -> io::Result<()> {
        for raw in frame_datagrams(frame_count, payload, chunk) {
            self.send(&raw).await?;
        }
        Ok(())
    }
}
