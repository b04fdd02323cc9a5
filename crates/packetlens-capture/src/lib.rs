//! # packetlens-capture
//!
//! Lifecycle management for the privileged helper capture process: spawning
//! under an elevation command, consuming its dump output through a
//! per-session parser, and delivering records and terminal events to a
//! single consumer.

pub mod channel;
pub mod elevation;
pub mod supervisor;

pub use channel::{CaptureEvent, SessionChannel};
pub use supervisor::{CaptureSession, CaptureSupervisor};
