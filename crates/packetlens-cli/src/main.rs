//! # plens — PacketLens CLI
//!
//! Starts privileged capture sessions from a filter expression or a
//! natural-language intent and prints parsed packet records as they arrive.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
        )
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
