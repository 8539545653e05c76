//! `wifiscope` binary: stream frames from a Wi-Fi microscope.
//!
//! Parses CLI arguments, runs a streaming session until Ctrl+C, and stores or
//! logs every completed frame.

mod cli;

use std::{num::NonZeroU16, process::ExitCode, time::Duration};

use clap::Parser;
use log::warn;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use wifiscope::{
    command::UdpCommandChannel,
    config::{ConfigError, StreamConfig},
    error::SessionError,
    session::{SessionReport, StreamSession},
    sink::{DirectorySink, FrameSink, LogSink},
};

fn config_from(cli: &cli::Cli) -> Result<StreamConfig, ConfigError> {
    let interval =
        NonZeroU16::new(cli.heartbeat_interval).ok_or(ConfigError::ZeroHeartbeatInterval)?;
    Ok(StreamConfig::default()
        .remote_host(cli.host)
        .command_port(cli.command_port)
        .bind_host(cli.bind)
        .receive_port(cli.receive_port)
        .recv_timeout(Duration::from_millis(cli.recv_timeout_ms))
        .heartbeat_interval(interval)
        .max_datagram_len(cli.max_datagram_len)
        .frame_queue(cli.frame_queue))
}

#[cfg(feature = "metrics")]
fn install_metrics(cli: &cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = cli.metrics_listen {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!(%addr, "serving metrics");
    }
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_metrics(cli: &cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.metrics_listen.is_some() {
        warn!("built without the metrics feature; ignoring --metrics-listen");
    }
    Ok(())
}

async fn stream(cli: cli::Cli, shutdown: CancellationToken) -> Result<SessionReport, SessionError> {
    let config = config_from(&cli)?;
    let commands = UdpCommandChannel::bind(config.command_addr())
        .await
        .map_err(SessionError::CommandSocket)?;
    let session = StreamSession::bind(config).await?;

    let sink: Box<dyn FrameSink> = match cli.output {
        Some(dir) => Box::new(
            DirectorySink::create(dir)
                .await
                .map_err(SessionError::SinkSetup)?,
        ),
        None => Box::new(LogSink::new()),
    };
    session.run(&commands, sink, shutdown).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    if let Err(err) = install_metrics(&cli) {
        error!("failed to start metrics exporter: {err}");
        return ExitCode::FAILURE;
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {err}");
            return;
        }
        info!("closing stream");
        on_signal.cancel();
    });

    match stream(cli, shutdown).await {
        Ok(report) => {
            info!(?report, "session finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
