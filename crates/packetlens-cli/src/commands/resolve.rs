//! `plens resolve` — Resolve an intent into a capture filter.

use clap::Args;
use packetlens_common::config::CaptureConfig;
use packetlens_intent::ResolveClient;

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Natural-language description of what to monitor.
    pub text: String,
}

/// Executes the `resolve` command.
///
/// Prints the filter expression the backend selects for the given text.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or reports an error.
pub fn execute(args: &ResolveArgs, config: &CaptureConfig) -> anyhow::Result<()> {
    let filter = ResolveClient::new(&config.backend_url).resolve(&args.text)?;
    println!("{filter}");
    Ok(())
}
