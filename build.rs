//! Build script rendering the `wifiscope(1)` manual page from the CLI
//! definition.
//!
//! The page lands in `target/man` unless `WIFISCOPE_MAN_DIR` points
//! elsewhere.

use std::{env, fs, io, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

const MAN_DIR_ENV: &str = "WIFISCOPE_MAN_DIR";

fn man_dir() -> PathBuf {
    env::var_os(MAN_DIR_ENV).map_or_else(|| PathBuf::from("target/man"), PathBuf::from)
}

fn render_manual() -> io::Result<Vec<u8>> {
    let cmd = cli::Cli::command().after_long_help(
        "The microscope streams JPEG frames as UDP datagrams once it receives \
         the start-up commands and keeps streaming while heartbeats arrive. \
         Press Ctrl+C to send the stop command and exit.",
    );
    let mut page = Vec::new();
    Man::new(cmd).render(&mut page)?;
    Ok(page)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed={MAN_DIR_ENV}");

    let dir = man_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("wifiscope.1"), render_manual()?)?;
    Ok(())
}
