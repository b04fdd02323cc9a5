//! Error types for the intent resolution client.

use thiserror::Error;

/// Errors surfaced while resolving an intent against the backend.
#[derive(Debug, Error)]
pub enum IntentError {
    /// The HTTP request itself failed (connection, timeout, status).
    #[error("backend request failed: {source}")]
    Http {
        /// Underlying HTTP client error.
        #[from]
        source: reqwest::Error,
    },

    /// The backend reported an application-level error.
    #[error("backend error: {message}")]
    Backend {
        /// Error message as returned by the backend.
        message: String,
    },

    /// The backend response did not contain a usable filter expression.
    #[error("backend response carried no filter for criteria {criteria:?}")]
    MissingFilter {
        /// The selected criteria title, when the backend named one.
        criteria: Option<String>,
    },
}

/// Convenience alias for intent resolution results.
pub type Result<T> = std::result::Result<T, IntentError>;
