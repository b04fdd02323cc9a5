//! Supervision of the privileged helper capture process.
//!
//! One session owns one helper process, one dump parser, and one event
//! channel. The supervisor never blocks the caller: spawning, output
//! consumption, and termination are all observed asynchronously, and every
//! failure surfaces as a terminal event on the session channel rather than
//! a synchronous error.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use packetlens_common::config::CaptureConfig;
use packetlens_common::error::PacketLensError;
use packetlens_common::types::{CaptureRequest, SessionId, SessionState};
use packetlens_parser::DumpParser;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Notify;

use crate::channel::{CaptureEvent, SessionChannel};
use crate::elevation;

/// Launches and supervises helper capture processes.
pub struct CaptureSupervisor {
    config: CaptureConfig,
}

impl CaptureSupervisor {
    /// Creates a supervisor with the given configuration.
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Returns the elevation command this supervisor will use.
    #[must_use]
    pub fn elevation_command(&self) -> String {
        self.config
            .elevation_override
            .clone()
            .unwrap_or_else(|| elevation::host_elevation_command().to_string())
    }

    /// Starts a capture session for the given request.
    ///
    /// Spawns `[elevation, helper, script, filter]` on a background task and
    /// returns immediately. Spawn failure is not synchronous: it arrives as
    /// a [`CaptureEvent::Failed`] on the session channel, since the caller
    /// observes the session asynchronously either way.
    ///
    /// Starting a second session while one is running is not guarded
    /// against; sessions do not share parser state, so the only contention
    /// is over the capture interface itself.
    #[must_use]
    pub fn start(&self, request: &CaptureRequest) -> CaptureSession {
        let session = CaptureSession::new();
        let elevation = self.elevation_command();
        let args = vec![
            self.config.helper_path.display().to_string(),
            self.config.script_path.display().to_string(),
            request.filter().to_string(),
        ];

        tracing::info!(
            id = %session.id(),
            elevation,
            filter = request.filter(),
            "starting capture session"
        );
        session.set_state(SessionState::Launching);

        let state = Arc::clone(&session.state);
        let channel = session.channel.clone();
        let stop = Arc::clone(&session.stop);
        drop(tokio::spawn(run_session(elevation, args, state, channel, stop)));

        session
    }
}

/// One lifecycle instance of a running helper process.
///
/// The process handle lives on the supervisor task; the session exposes the
/// lifecycle state, the event channel, and a best-effort stop signal.
#[derive(Debug)]
pub struct CaptureSession {
    id: SessionId,
    created_at: String,
    state: Arc<Mutex<SessionState>>,
    channel: SessionChannel,
    stop: Arc<Notify>,
}

impl CaptureSession {
    fn new() -> Self {
        Self {
            id: SessionId::generate(),
            created_at: chrono::Utc::now().to_rfc3339(),
            state: Arc::new(Mutex::new(SessionState::Idle)),
            channel: SessionChannel::new(),
            stop: Arc::new(Notify::new()),
        }
    }

    /// Unique identifier of this session.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// ISO-8601 timestamp of session creation.
    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .map_or(SessionState::Terminated, |guard| *guard)
    }

    /// Registers a consumer for this session's events, replacing any prior
    /// registration (the old receiver closes cleanly).
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<CaptureEvent> {
        self.channel.subscribe()
    }

    /// Removes the current consumer registration.
    pub fn unsubscribe(&self) {
        self.channel.unsubscribe();
    }

    /// Requests termination of the helper process.
    ///
    /// Best-effort and asynchronous: records already in flight may still be
    /// delivered, and the terminal event on the channel is the only reliable
    /// signal that the stream has ended. Calling this after termination is
    /// a no-op.
    pub fn stop(&self) {
        tracing::info!(id = %self.id, "stop requested");
        self.stop.notify_one();
    }

    fn set_state(&self, next: SessionState) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = next;
        }
    }
}

/// Marks the session terminated and publishes the terminal event.
///
/// The first terminal transition wins; later calls are ignored, so a stop
/// racing a natural exit cannot produce a second `Ended` or interleave a
/// `Failed` after one.
fn terminate(state: &Mutex<SessionState>, channel: &SessionChannel, event: CaptureEvent) {
    {
        let Ok(mut guard) = state.lock() else {
            return;
        };
        if *guard == SessionState::Terminated {
            return;
        }
        *guard = SessionState::Terminated;
    }
    channel.publish(event);
}

fn set_state(state: &Mutex<SessionState>, next: SessionState) {
    if let Ok(mut guard) = state.lock() {
        *guard = next;
    }
}

/// How often the read loop checks whether the helper has exited.
///
/// Stdout EOF alone is not a reliable exit signal: a forked descendant of
/// the elevation wrapper can inherit the pipe's write end and keep it open
/// after the direct child is gone.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long to keep draining already-buffered output once the helper has
/// exited but the pipe is still held open by a descendant.
const DRAIN_WINDOW: Duration = Duration::from_millis(250);

/// Drives one helper process from spawn to terminal event.
async fn run_session(
    elevation: String,
    args: Vec<String>,
    state: Arc<Mutex<SessionState>>,
    channel: SessionChannel,
    stop: Arc<Notify>,
) {
    let mut command = Command::new(&elevation);
    let _ = command
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // The child leads its own process group so a stop can signal the whole
    // helper tree, not just the elevation wrapper.
    #[cfg(unix)]
    let _ = command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let cause = PacketLensError::Spawn {
                command: elevation,
                source: e,
            };
            tracing::error!(error = %cause, "helper spawn failed");
            terminate(&state, &channel, CaptureEvent::Failed(cause.to_string()));
            return;
        }
    };

    set_state(&state, SessionState::Running);
    tracing::info!(pid = child.id(), "helper process started");

    if let Some(stderr) = child.stderr.take() {
        drop(tokio::spawn(drain_stderr(stderr)));
    }

    let Some(mut stdout) = child.stdout.take() else {
        let _ = child.start_kill();
        terminate(
            &state,
            &channel,
            CaptureEvent::Failed("helper stdout unavailable".into()),
        );
        return;
    };

    let mut parser = DumpParser::new();
    let mut buf = [0u8; packetlens_common::constants::READ_BUFFER_SIZE];
    let mut stopping = false;

    // Runs until stdout EOF or until the child is observed to have exited,
    // whichever comes first.
    let early_status = loop {
        tokio::select! {
            read = stdout.read(&mut buf) => match read {
                Ok(0) => break None,
                Ok(n) => {
                    parser.feed(&buf[..n]);
                    // One stdout delivery is one packet dump.
                    if let Some(record) = parser.take_record() {
                        channel.publish(CaptureEvent::Packet(record));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "helper stdout read failed");
                    request_stop(&mut child);
                    let _ = child.wait().await;
                    terminate(
                        &state,
                        &channel,
                        CaptureEvent::Failed(format!("helper output read failed: {e}")),
                    );
                    return;
                }
            },
            _ = stop.notified(), if !stopping => {
                stopping = true;
                request_stop(&mut child);
            }
            () = tokio::time::sleep(EXIT_POLL_INTERVAL) => {
                if let Ok(Some(status)) = child.try_wait() {
                    break Some(status);
                }
            }
        }
    };

    let code = if let Some(status) = early_status {
        // The child is gone but a descendant still holds the pipe's write
        // end. Drain what is already buffered, bounded so the session
        // reaches its terminal event regardless.
        let deadline = tokio::time::Instant::now() + DRAIN_WINDOW;
        loop {
            match tokio::time::timeout_at(deadline, stdout.read(&mut buf)).await {
                Ok(Ok(n)) if n > 0 => {
                    parser.feed(&buf[..n]);
                    if let Some(record) = parser.take_record() {
                        channel.publish(CaptureEvent::Packet(record));
                    }
                }
                _ => break,
            }
        }
        status.code().unwrap_or(-1)
    } else {
        match child.wait().await {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                tracing::warn!(error = %e, "failed to reap helper process");
                -1
            }
        }
    };

    // Flush a final unterminated line before reporting the exit.
    if let Some(record) = parser.finish() {
        channel.publish(CaptureEvent::Packet(record));
    }

    tracing::info!(code, "helper process exited");
    terminate(&state, &channel, CaptureEvent::Ended(code));
}

/// Sends a graceful termination signal to the helper.
///
/// On Unix this is SIGTERM to the child's process group, so forked
/// descendants of the elevation wrapper terminate along with it; the hard
/// kill is the fallback when no PID is available or the signal cannot be
/// delivered. A helper running with elevated privileges may refuse signals
/// from an unprivileged supervisor; the stop stays best-effort in that
/// case and the session ends only when the helper does.
fn request_stop(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id().and_then(|p| i32::try_from(p).ok()) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        // The child was spawned as its own process group leader.
        if killpg(Pid::from_raw(pid), Signal::SIGTERM).is_ok() {
            tracing::info!(pid, "sent SIGTERM to helper process group");
            return;
        }
    }
    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "failed to kill helper");
    }
}

/// Forwards helper stderr to diagnostic logging; it is never parsed.
async fn drain_stderr(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::warn!(line = %line, "helper stderr");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_idle() {
        let session = CaptureSession::new();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn terminate_is_idempotent() {
        let session = CaptureSession::new();
        terminate(&session.state, &session.channel, CaptureEvent::Ended(0));
        assert_eq!(session.state(), SessionState::Terminated);

        // A second terminal signal is ignored.
        terminate(
            &session.state,
            &session.channel,
            CaptureEvent::Failed("late".into()),
        );
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[tokio::test]
    async fn second_terminal_event_is_never_published() {
        let session = CaptureSession::new();
        let mut rx = session.subscribe();

        terminate(&session.state, &session.channel, CaptureEvent::Ended(0));
        terminate(&session.state, &session.channel, CaptureEvent::Ended(1));
        drop(session);

        assert!(matches!(rx.recv().await, Some(CaptureEvent::Ended(0))));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn stop_after_termination_is_a_no_op() {
        let session = CaptureSession::new();
        terminate(&session.state, &session.channel, CaptureEvent::Ended(0));
        session.stop();
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[test]
    fn elevation_override_takes_precedence() {
        let mut config = CaptureConfig::default();
        config.elevation_override = Some("doas".into());
        let supervisor = CaptureSupervisor::new(config);
        assert_eq!(supervisor.elevation_command(), "doas");
    }

    #[test]
    fn default_elevation_follows_host_os() {
        let supervisor = CaptureSupervisor::new(CaptureConfig::default());
        assert_eq!(
            supervisor.elevation_command(),
            crate::elevation::host_elevation_command()
        );
    }
}
