//! `plens capture` — Start a capture session and stream parsed records.

use clap::Args;
use packetlens_capture::{CaptureEvent, CaptureSupervisor};
use packetlens_common::config::CaptureConfig;
use packetlens_common::types::CaptureRequest;
use packetlens_intent::ResolveClient;

/// Arguments for the `capture` command.
#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Capture filter expression, passed to the helper verbatim.
    #[arg(required_unless_present = "intent", conflicts_with = "intent")]
    pub filter: Option<String>,

    /// Natural-language intent, resolved to a filter via the backend.
    #[arg(short, long)]
    pub intent: Option<String>,

    /// Print records as JSON lines instead of aligned text.
    #[arg(long)]
    pub json: bool,
}

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Executes the `capture` command.
///
/// Resolves the filter (directly or through the intent backend), runs the
/// session event loop, and returns when the session reaches its terminal
/// event. Ctrl+C requests a stop; the helper's exit still arrives through
/// the channel.
///
/// # Errors
///
/// Returns an error if intent resolution fails or the session fails to
/// spawn the helper.
pub fn execute(args: CaptureArgs, config: CaptureConfig) -> anyhow::Result<()> {
    let filter = match (args.filter, args.intent) {
        (Some(filter), _) => filter,
        (None, Some(text)) => {
            eprintln!("  Resolving intent via {DIM}{}{RESET}...", config.backend_url);
            let filter = ResolveClient::new(&config.backend_url).resolve(&text)?;
            tracing::info!(filter, "intent resolved");
            filter
        }
        (None, None) => anyhow::bail!("provide a FILTER or --intent"),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_session(config, filter, args.json))
}

async fn run_session(config: CaptureConfig, filter: String, json: bool) -> anyhow::Result<()> {
    let supervisor = CaptureSupervisor::new(config);
    let elevation = supervisor.elevation_command();

    eprintln!();
    eprintln!("  {BOLD}PacketLens{RESET} {DIM}v{}{RESET}", env!("CARGO_PKG_VERSION"));
    eprintln!("  Filter: {BOLD}{filter}{RESET}");
    eprintln!("  Requesting privileges via {BOLD}{elevation}{RESET}...");
    eprintln!("  Press {BOLD}Ctrl+C{RESET} to stop.");
    eprintln!();

    let session = supervisor.start(&CaptureRequest::new(filter));
    let mut events = session.subscribe();
    let mut count: u64 = 0;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(CaptureEvent::Packet(record)) => {
                    count += 1;
                    if json {
                        println!("{}", serde_json::to_string(&record)?);
                    } else {
                        println!("{}", crate::output::format_record(&record));
                    }
                }
                Some(CaptureEvent::Ended(code)) => {
                    eprintln!();
                    eprintln!(
                        "  {GREEN}●{RESET} Helper exited with code {BOLD}{code}{RESET} \
                         {DIM}({count} packet(s) captured){RESET}"
                    );
                    return Ok(());
                }
                Some(CaptureEvent::Failed(cause)) => {
                    eprintln!();
                    eprintln!("  {RED}●{RESET} Capture failed: {cause}");
                    return Err(anyhow::anyhow!(cause));
                }
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                eprintln!();
                eprintln!("  Stopping capture...");
                session.stop();
            }
        }
    }
}
