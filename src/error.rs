//! Canonical error types for streaming sessions.

use std::{io, net::SocketAddr};

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end a streaming session.
///
/// Receive timeouts, receive errors and failed command sends are not in this
/// list; the session logs and counts them and keeps going.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected before any socket was opened.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The data socket could not be bound.
    #[error("failed to bind data socket on {addr}: {source}")]
    Bind {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// The command socket could not be opened.
    #[error("failed to open command socket: {0}")]
    CommandSocket(#[source] io::Error),
    /// The frame sink could not be prepared.
    #[error("failed to prepare frame sink: {0}")]
    SinkSetup(#[source] io::Error),
    /// The sink task stopped accepting frames while the stream was running.
    #[error("frame sink stopped before the session ended")]
    SinkClosed,
    /// The sink task panicked or was aborted.
    #[error("frame sink task failed: {0}")]
    SinkTask(#[from] tokio::task::JoinError),
}

/// Result alias used by session APIs.
pub type Result<T> = std::result::Result<T, SessionError>;
