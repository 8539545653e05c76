//! Recording replacement for the device command channel.

use std::{
    io,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use rstest::fixture;
use wifiscope::command::{Command, CommandTransport};

/// Command transport that records what it was asked to send.
///
/// Clones share the same log, so a test can keep one handle while the
/// session borrows another.
#[derive(Clone, Debug, Default)]
pub struct RecordingCommands {
    sent: Arc<Mutex<Vec<Command>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingCommands {
    /// Create a transport that accepts every command.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Make every later send fail with `NetworkUnreachable`. Failed sends are
    /// still recorded.
    pub fn fail_sends(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

    /// Snapshot of every command sent so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex was poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<Command> { self.sent.lock().expect("command log poisoned").clone() }

    /// Number of times `command` was sent.
    #[must_use]
    pub fn count(&self, command: Command) -> usize {
        self.sent().into_iter().filter(|sent| *sent == command).count()
    }
}

#[async_trait]
impl CommandTransport for RecordingCommands {
    async fn send(&self, command: Command) -> io::Result<()> {
        self.sent.lock().expect("command log poisoned").push(command);
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::from(io::ErrorKind::NetworkUnreachable));
        }
        Ok(())
    }
}

/// Fixture providing a fresh [`RecordingCommands`].
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn recording_commands() -> RecordingCommands { RecordingCommands::new() }
