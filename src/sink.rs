//! Consumers of completed frames.
//!
//! A [`FrameSink`] receives frames one at a time, in emission order, on a
//! task separate from the receive loop. Decoding and display live behind this
//! seam; the sinks shipped here store or log the compressed frames.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::reassembly::CompletedFrame;

/// Errors raised by frame sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the frame failed.
    #[error("failed to store frame: {0}")]
    Io(#[from] io::Error),
}

/// Destination for completed frames.
#[async_trait]
pub trait FrameSink: Send {
    /// Consume one frame.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the frame could not be handled. The error
    /// is logged by the caller and does not stop the stream.
    async fn accept(&mut self, frame: CompletedFrame) -> Result<(), SinkError>;

    /// Called once after the last frame of a session.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if buffered state could not be flushed.
    async fn finish(&mut self) -> Result<(), SinkError> { Ok(()) }
}

#[async_trait]
impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    async fn accept(&mut self, frame: CompletedFrame) -> Result<(), SinkError> {
        (**self).accept(frame).await
    }

    async fn finish(&mut self) -> Result<(), SinkError> { (**self).finish().await }
}

/// Writes every frame to `frame-NNNNNN.jpg` inside a directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: u64,
}

impl DirectorySink {
    /// Create the directory if needed and prepare to write frames into it.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the directory cannot be created.
    pub async fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir, written: 0 })
    }

    /// Directory frames are written to.
    #[must_use]
    pub fn dir(&self) -> &Path { &self.dir }

    /// Number of frames written so far.
    #[must_use]
    pub const fn written(&self) -> u64 { self.written }

    fn path_for(&self, sequence: u64) -> PathBuf {
        self.dir.join(format!("frame-{sequence:06}.jpg"))
    }
}

#[async_trait]
impl FrameSink for DirectorySink {
    async fn accept(&mut self, frame: CompletedFrame) -> Result<(), SinkError> {
        if !frame.has_jpeg_markers() {
            warn!(
                frame_count = frame.frame_count().get(),
                len = frame.len(),
                "frame lacks JPEG markers, storing anyway"
            );
        }
        let path = self.path_for(self.written);
        tokio::fs::write(&path, frame.payload()).await?;
        self.written += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        info!(dir = %self.dir.display(), frames = self.written, "frames stored");
        Ok(())
    }
}

/// Logs a line per frame and discards the bytes.
#[derive(Debug, Default)]
pub struct LogSink {
    seen: u64,
}

impl LogSink {
    /// Create a logging sink.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of frames logged.
    #[must_use]
    pub const fn seen(&self) -> u64 { self.seen }
}

#[async_trait]
impl FrameSink for LogSink {
    async fn accept(&mut self, frame: CompletedFrame) -> Result<(), SinkError> {
        self.seen += 1;
        info!(
            frame_count = frame.frame_count().get(),
            datagrams = frame.datagrams(),
            len = frame.len(),
            jpeg = frame.has_jpeg_markers(),
            "frame received"
        );
        Ok(())
    }
}
