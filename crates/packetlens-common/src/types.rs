//! Domain primitive types used across the PacketLens workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a capture session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable capture request holding the filter expression.
///
/// The filter is passed through to the helper process verbatim; no syntax
/// validation happens on this side. An empty filter captures everything the
/// helper is willing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    filter: String,
}

impl CaptureRequest {
    /// Creates a request from a filter expression string.
    #[must_use]
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }

    /// Returns the filter expression.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

/// Lifecycle state of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Session has been constructed but the helper is not yet spawning.
    Idle,
    /// Spawn of the helper process has been requested.
    Launching,
    /// The helper process handle was obtained and output is being consumed.
    Running,
    /// The helper exited or failed; no further records will be delivered.
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Launching => write!(f, "launching"),
            Self::Running => write!(f, "running"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn capture_request_passes_filter_verbatim() {
        let req = CaptureRequest::new("tcp and dst port 443");
        assert_eq!(req.filter(), "tcp and dst port 443");
    }

    #[test]
    fn empty_filter_is_preserved() {
        let req = CaptureRequest::new("");
        assert_eq!(req.filter(), "");
    }

    #[test]
    fn session_state_displays_lowercase() {
        assert_eq!(SessionState::Running.to_string(), "running");
        assert_eq!(SessionState::Terminated.to_string(), "terminated");
    }
}
