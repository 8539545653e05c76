//! Frame sink that forwards frames to the test body.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::mpsc;
use wifiscope::{
    reassembly::CompletedFrame,
    sink::{FrameSink, SinkError},
};

/// Sink that sends every accepted frame over an unbounded channel.
#[derive(Debug)]
pub struct ChannelSink {
    frames: mpsc::UnboundedSender<CompletedFrame>,
    finished: Arc<AtomicBool>,
}

impl ChannelSink {
    /// Handle reporting whether [`FrameSink::finish`] has run.
    #[must_use]
    pub fn finished_flag(&self) -> Arc<AtomicBool> { Arc::clone(&self.finished) }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn accept(&mut self, frame: CompletedFrame) -> Result<(), SinkError> {
        // The receiver may already be gone when a test only counts frames.
        let _ = self.frames.send(frame);
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        self.finished.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Create a [`ChannelSink`] and the receiver its frames arrive on.
#[must_use]
pub fn channel_sink() -> (ChannelSink, mpsc::UnboundedReceiver<CompletedFrame>) {
    let (frames, rx) = mpsc::unbounded_channel();
    (
        ChannelSink {
            frames,
            finished: Arc::new(AtomicBool::new(false)),
        },
        rx,
    )
}
