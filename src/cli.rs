//! Command line interface for the `wifiscope` binary.
//!
//! Kept free of crate imports so the build script can include it to render
//! the man page.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// Command line arguments for the `wifiscope` binary.
#[derive(Debug, Parser)]
#[command(
    name = "wifiscope",
    version,
    about = "Receive the video stream of a Wi-Fi microscope"
)]
pub struct Cli {
    /// Address of the microscope.
    #[arg(long, default_value = "192.168.29.1")]
    pub host: IpAddr,

    /// Port the microscope accepts commands on.
    #[arg(long, default_value_t = 20_000)]
    pub command_port: u16,

    /// Local address to receive video datagrams on.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Local port to receive video datagrams on.
    #[arg(long, default_value_t = 10_900)]
    pub receive_port: u16,

    /// Milliseconds a receive may wait before the loop checks in again.
    #[arg(long, default_value_t = 5_000)]
    pub recv_timeout_ms: u64,

    /// Send a heartbeat whenever a frame counter is a multiple of this value.
    #[arg(long, default_value_t = 50)]
    pub heartbeat_interval: u16,

    /// Receive buffer size in bytes. Longer datagrams are truncated.
    #[arg(long, default_value_t = 65_507)]
    pub max_datagram_len: usize,

    /// Completed frames that may wait for the sink before frames are dropped.
    #[arg(long, default_value_t = 8)]
    pub frame_queue: usize,

    /// Directory to store frames in. Frames are only logged when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_listen: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_target_the_factory_network() {
        let cli = Cli::parse_from(["wifiscope"]);
        assert_eq!(cli.host.to_string(), "192.168.29.1");
        assert_eq!(cli.command_port, 20_000);
        assert_eq!(cli.receive_port, 10_900);
        assert_eq!(cli.heartbeat_interval, 50);
        assert_eq!(cli.max_datagram_len, 65_507);
        assert!(cli.output.is_none());
    }

    #[test]
    fn parses_output_and_interval() {
        let cli = Cli::parse_from([
            "wifiscope",
            "--output",
            "frames",
            "--heartbeat-interval",
            "10",
            "--max-datagram-len",
            "1500",
        ]);
        assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("frames")));
        assert_eq!(cli.heartbeat_interval, 10);
        assert_eq!(cli.max_datagram_len, 1500);
    }
}
