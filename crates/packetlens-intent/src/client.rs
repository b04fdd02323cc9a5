//! Blocking HTTP client for the backend's `/query` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{IntentError, Result};

/// Request body for `/query`.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Top-level `/query` response: either a resolution result or an error.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    response: Option<Resolution>,
    #[serde(default)]
    error: Option<String>,
}

/// The backend's resolution state: which criteria it selected and the full
/// criteria set it currently knows.
#[derive(Debug, Deserialize)]
struct Resolution {
    #[serde(default)]
    selected_criteria: Option<String>,
    #[serde(default)]
    existing_criteria: Vec<Criteria>,
}

/// One stored monitoring criteria with its capture filter.
#[derive(Debug, Deserialize)]
struct Criteria {
    title: String,
    scapy_str: String,
}

/// Client for the intent resolution backend.
pub struct ResolveClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ResolveClient {
    /// Creates a client against the given backend base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Resolves a free-text monitoring intent into a capture filter.
    ///
    /// Posts the text to `/query` and returns the filter attached to the
    /// criteria the backend selected. The filter is treated as opaque; no
    /// syntax validation happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend reports an
    /// error, or the selected criteria has no filter.
    pub fn resolve(&self, text: &str) -> Result<String> {
        let url = format!("{}/query", self.base_url.trim_end_matches('/'));
        tracing::debug!(url, "resolving intent");

        let response: QueryResponse = self
            .client
            .post(&url)
            .json(&QueryRequest { query: text })
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(message) = response.error {
            return Err(IntentError::Backend { message });
        }

        let resolution = response
            .response
            .ok_or_else(|| IntentError::MissingFilter { criteria: None })?;
        let selected = resolution.selected_criteria;
        resolution
            .existing_criteria
            .into_iter()
            .find(|c| Some(&c.title) == selected.as_ref())
            .map(|c| c.scapy_str)
            .ok_or_else(|| IntentError::MissingFilter { criteria: selected })
    }
}
