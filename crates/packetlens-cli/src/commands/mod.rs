//! CLI command definitions and dispatch.

pub mod capture;
pub mod info;
pub mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use packetlens_common::config::CaptureConfig;

/// PacketLens — natural-language driven packet capture.
#[derive(Parser, Debug)]
#[command(name = "plens", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a capture session and print parsed packet records.
    Capture(capture::CaptureArgs),
    /// Resolve a natural-language intent into a capture filter.
    Resolve(resolve::ResolveArgs),
    /// Show platform, elevation command, and helper configuration.
    Info(info::InfoArgs),
}

/// Loads the configuration named on the command line, or the default one.
///
/// # Errors
///
/// Returns an error if an existing config file cannot be read or parsed.
pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CaptureConfig> {
    let path = path.cloned().unwrap_or_else(packetlens_common::constants::default_config_file);
    Ok(CaptureConfig::load(&path)?)
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;
    match cli.command {
        Command::Capture(args) => capture::execute(args, config),
        Command::Resolve(args) => resolve::execute(&args, &config),
        Command::Info(args) => info::execute(&args, &config),
    }
}
