//! Streaming session driver.
//!
//! [`StreamSession`] owns the data socket and runs the receive loop: it
//! performs the start-up handshake, feeds every datagram to a
//! [`FrameReassembler`], sends heartbeats on schedule, and hands completed
//! frames to a [`FrameSink`] running on its own task. Cancellation stops
//! ingestion, sends the stop command, and releases the socket. The frame in
//! progress at that point is discarded.

use std::net::SocketAddr;

use log::warn;
use tokio::{
    net::UdpSocket,
    select,
    sync::mpsc::{self, error::TrySendError},
    time::timeout,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::{
    command::{Command, CommandTransport},
    config::StreamConfig,
    datagram::FrameCount,
    error::{Result, SessionError},
    heartbeat::{HeartbeatEmitter, HeartbeatSchedule},
    metrics::{self, DatagramOutcome, FrameOutcome},
    reassembly::{CompletedFrame, FrameReassembler, IngestOutcome},
    sink::FrameSink,
};

/// Counters describing how a session went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Datagrams read from the data socket.
    pub datagrams_received: u64,
    /// Datagrams ignored for lacking a payload.
    pub datagrams_discarded: u64,
    /// Frames emitted by the reassembler.
    pub frames_completed: u64,
    /// Completed frames dropped because the sink queue was full.
    pub frames_dropped: u64,
    /// Frames the sink failed to handle.
    pub sink_failures: u64,
    /// Heartbeats handed to the command transport.
    pub heartbeats_sent: u64,
    /// Heartbeats the command transport rejected.
    pub heartbeats_failed: u64,
    /// Receives that waited a full timeout without data.
    pub recv_timeouts: u64,
    /// Receives that failed with a socket error.
    pub recv_errors: u64,
    /// Datagrams whose packet index went backwards within a frame.
    pub out_of_order_indices: u64,
}

/// A streaming session with its data socket bound.
#[derive(Debug)]
pub struct StreamSession {
    config: StreamConfig,
    socket: UdpSocket,
}

impl StreamSession {
    /// Validate `config` and bind the data socket.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for unusable settings and
    /// [`SessionError::Bind`] if the receive address cannot be bound.
    pub async fn bind(config: StreamConfig) -> Result<Self> {
        config.validate()?;
        let addr = config.receive_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| SessionError::Bind { addr, source })?;
        Ok(Self { config, socket })
    }

    /// Address the data socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Bind`] if the address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(|source| SessionError::Bind {
            addr: self.config.receive_addr(),
            source,
        })
    }

    /// Configuration the session was bound with.
    #[must_use]
    pub const fn config(&self) -> &StreamConfig { &self.config }

    /// Run the session until `shutdown` is cancelled.
    ///
    /// Command send failures, receive timeouts and receive errors are logged
    /// and counted in the returned [`SessionReport`]; none of them ends the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SinkClosed`] if the sink task goes away while
    /// frames are still arriving, and [`SessionError::SinkTask`] if it
    /// panicked.
    pub async fn run<T, S>(
        self,
        commands: &T,
        sink: S,
        shutdown: CancellationToken,
    ) -> Result<SessionReport>
    where
        T: CommandTransport + ?Sized,
        S: FrameSink + 'static,
    {
        let StreamSession { config, socket } = self;
        let mut report = SessionReport::default();

        for command in Command::STARTUP {
            let sent = send_command(commands, command).await;
            if command == Command::Heartbeat {
                report.record_heartbeat(sent);
            }
        }

        let (frames_tx, frames_rx) = mpsc::channel(config.frame_queue_capacity());
        let sink_task = tokio::spawn(drain_frames(sink, frames_rx));

        let mut pump = Pump {
            reassembler: FrameReassembler::new(),
            schedule: config.heartbeat_schedule(),
            heartbeat: HeartbeatEmitter::new(commands),
            frames: frames_tx,
            report: &mut report,
        };
        let mut buf = vec![0_u8; config.max_datagram_len_value()];
        let recv_timeout = config.recv_timeout_value();
        info!(local = ?socket.local_addr().ok(), remote = %config.command_addr(), "starting stream");

        let outcome = loop {
            select! {
                biased;
                () = shutdown.cancelled() => break Ok(()),
                received = timeout(recv_timeout, socket.recv_from(&mut buf)) => match received {
                    Err(_) => pump.on_timeout(),
                    Ok(Err(err)) => pump.on_recv_error(&err),
                    Ok(Ok((len, peer))) => {
                        trace!(len, %peer, "datagram received");
                        if let Err(err) = pump.on_datagram(&buf[..len]).await {
                            break Err(err);
                        }
                    }
                },
            }
        };

        let Pump {
            reassembler,
            frames,
            ..
        } = pump;
        if reassembler.buffered_len() > 0 {
            debug!(
                bytes = reassembler.buffered_len(),
                "discarding partial frame at end of stream"
            );
        }
        report.out_of_order_indices = reassembler.out_of_order_indices();

        info!("stopping stream");
        send_command(commands, Command::Stop).await;
        drop(socket);
        drop(frames);
        report.sink_failures = sink_task.await?;

        outcome?;
        info!(
            frames = report.frames_completed,
            dropped = report.frames_dropped,
            datagrams = report.datagrams_received,
            "stream stopped"
        );
        Ok(report)
    }
}

impl SessionReport {
    fn record_heartbeat(&mut self, sent: bool) {
        if sent {
            self.heartbeats_sent += 1;
        } else {
            self.heartbeats_failed += 1;
        }
        metrics::inc_heartbeats(sent);
    }
}

struct Pump<'a, T: ?Sized> {
    reassembler: FrameReassembler,
    schedule: HeartbeatSchedule,
    heartbeat: HeartbeatEmitter<'a, T>,
    frames: mpsc::Sender<CompletedFrame>,
    report: &'a mut SessionReport,
}

impl<T> Pump<'_, T>
where
    T: CommandTransport + ?Sized,
{
    fn on_timeout(&mut self) {
        self.report.recv_timeouts += 1;
        metrics::inc_recv_timeouts();
        debug!("no datagram within receive timeout");
    }

    fn on_recv_error(&mut self, err: &std::io::Error) {
        self.report.recv_errors += 1;
        metrics::inc_recv_errors();
        warn!("receive failed: {err}");
    }

    async fn on_datagram(&mut self, raw: &[u8]) -> Result<()> {
        self.report.datagrams_received += 1;
        match self.reassembler.ingest_datagram(raw) {
            IngestOutcome::Discarded => {
                self.report.datagrams_discarded += 1;
                metrics::inc_datagrams(DatagramOutcome::Discarded);
            }
            IngestOutcome::Appended => metrics::inc_datagrams(DatagramOutcome::Accepted),
            IngestOutcome::FrameStarted {
                frame_count,
                completed,
            } => {
                metrics::inc_datagrams(DatagramOutcome::Accepted);
                if let Some(frame) = completed {
                    self.deliver(frame)?;
                }
                self.maybe_heartbeat(frame_count).await;
            }
        }
        Ok(())
    }

    fn deliver(&mut self, frame: CompletedFrame) -> Result<()> {
        self.report.frames_completed += 1;
        let frame_count = frame.frame_count();
        match self.frames.try_send(frame) {
            Ok(()) => {
                metrics::inc_frames(FrameOutcome::Delivered);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.report.frames_dropped += 1;
                metrics::inc_frames(FrameOutcome::Dropped);
                warn!("sink is behind, dropping frame {frame_count}");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(SessionError::SinkClosed),
        }
    }

    async fn maybe_heartbeat(&mut self, frame_count: FrameCount) {
        if !self.schedule.is_due(frame_count) {
            return;
        }
        let sent = match self.heartbeat.send_heartbeat().await {
            Ok(()) => true,
            Err(err) => {
                warn!("heartbeat at frame {frame_count} failed: {err}");
                false
            }
        };
        self.report.record_heartbeat(sent);
    }
}

async fn send_command<T>(commands: &T, command: Command) -> bool
where
    T: CommandTransport + ?Sized,
{
    match commands.send(command).await {
        Ok(()) => {
            debug!(command = command.as_str(), "command sent");
            true
        }
        Err(err) => {
            warn!("failed to send {} command: {err}", command.as_str());
            false
        }
    }
}

async fn drain_frames<S: FrameSink>(
    mut sink: S,
    mut frames: mpsc::Receiver<CompletedFrame>,
) -> u64 {
    let mut failures = 0;
    while let Some(frame) = frames.recv().await {
        let frame_count = frame.frame_count();
        if let Err(err) = sink.accept(frame).await {
            failures += 1;
            warn!("sink rejected frame {frame_count}: {err}");
        }
    }
    if let Err(err) = sink.finish().await {
        failures += 1;
        warn!("sink failed to finish: {err}");
    }
    failures
}
