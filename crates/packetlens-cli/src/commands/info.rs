//! `plens info` — Show platform and helper configuration.

use clap::Args;
use packetlens_capture::elevation;
use packetlens_common::config::CaptureConfig;

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {}

/// Executes the `info` command.
///
/// # Errors
///
/// Never fails; the signature matches the other command handlers.
pub fn execute(_args: &InfoArgs, config: &CaptureConfig) -> anyhow::Result<()> {
    let command = config
        .elevation_override
        .clone()
        .unwrap_or_else(|| elevation::host_elevation_command().to_string());
    let available = if elevation::elevation_available(&command) {
        "available"
    } else {
        "not found on PATH"
    };

    println!("os:         {}", std::env::consts::OS);
    println!("arch:       {}", std::env::consts::ARCH);
    println!("elevation:  {command} ({available})");
    println!("helper:     {}", config.helper_path.display());
    println!("script:     {}", config.script_path.display());
    println!("backend:    {}", config.backend_url);
    Ok(())
}
