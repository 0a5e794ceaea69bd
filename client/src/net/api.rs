//! Request/response transport: one `POST` returns the full result set.
//!
//! ERROR HANDLING
//! ==============
//! Anything other than `201 Created` with a JSON array body is a failure.
//! [`run_summarize`] reports failures through the event sink instead of
//! returning them, so callers only ever see events.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use frames::{ResultItem, SummarizeRequest};
use reqwest::StatusCode;

use super::events::SummaryEvents;
use super::types::TransportError;
use crate::config::Timeouts;

/// Path of the summarize endpoint, relative to the API base URL.
pub const SUMMARIZE_PATH: &str = "/api/v1/summarize";

/// HTTP client for the summarize endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (http or https).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidBaseUrl`] for other schemes and
    /// [`TransportError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, TransportError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidBaseUrl(base_url.to_owned()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{SUMMARIZE_PATH}", self.base_url)
    }

    /// Send one summarize request and return every result item.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] on network failure,
    /// [`TransportError::Status`] for any status other than 201, and
    /// [`TransportError::Payload`] when the body is not a result array.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<Vec<ResultItem>, TransportError> {
        let response = self.http.post(self.endpoint()).json(request).send().await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Run one request and report the outcome to `events`.
///
/// Always ends with `on_closed`.
pub async fn run_summarize<E: SummaryEvents>(client: &ApiClient, request: &SummarizeRequest, events: &mut E) {
    tracing::info!(endpoint = %client.endpoint(), sentences_per_group = request.sentences_per_group, "summarize request");
    match client.summarize(request).await {
        Ok(items) => {
            tracing::debug!(count = items.len(), "summarize reply");
            events.on_items(items);
        }
        Err(error) => {
            tracing::debug!(%error, "summarize request failed");
            events.on_fatal_error(&error);
        }
    }
    events.on_closed();
}
