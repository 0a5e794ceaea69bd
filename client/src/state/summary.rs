//! Summary request state: results, the fetching flag and pending notices.
//!
//! DESIGN
//! ======
//! This is the single writer for everything a summarize request produces.
//! Transport errors never propagate past here; each becomes one [`Notice`]
//! and partial results already received stay visible.

#[cfg(test)]
#[path = "summary_test.rs"]
mod summary_test;

use frames::ResultItem;

use super::results::{ResultBuffer, WindowPolicy};
use crate::net::{SummaryEvents, TransportError, TransportEvent};

/// Title used for every error notice.
pub const ERROR_TITLE: &str = "Error";

/// Fallback notice text when the service gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while summarizing the text.";

/// A user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

impl Notice {
    /// An error notice with the given text.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_owned(),
            text: text.into(),
        }
    }
}

/// State for one summarize session.
#[derive(Clone, Debug, Default)]
pub struct SummaryState {
    pub results: ResultBuffer,
    pub fetching: bool,
    notices: Vec<Notice>,
}

impl SummaryState {
    #[must_use]
    pub fn new(limit: usize, policy: WindowPolicy) -> Self {
        Self {
            results: ResultBuffer::new(limit, policy),
            fetching: false,
            notices: Vec::new(),
        }
    }

    /// Clear results and mark a new request as in flight.
    pub fn begin_request(&mut self) {
        self.results.reset();
        self.fetching = true;
    }

    /// Surface a service error without touching results or pagination.
    pub fn receive_error(&mut self, message: Option<&str>) {
        let text = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(GENERIC_ERROR_MESSAGE);
        self.notices.push(Notice::error(text));
        self.fetching = false;
    }

    /// Apply an event received from a transport task.
    pub fn apply(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Items(items) => self.on_items(items),
            TransportEvent::Error(message) => self.on_error(message),
            TransportEvent::Fatal(detail) => self.fatal(&detail),
            TransportEvent::Closed => self.on_closed(),
        }
    }

    /// Remove and return the pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn fatal(&mut self, detail: &str) {
        tracing::warn!(error = %detail, "summarize transport failed");
        self.receive_error(None);
    }
}

impl SummaryEvents for SummaryState {
    fn on_items(&mut self, items: Vec<ResultItem>) {
        self.results.append_page(items);
        self.fetching = false;
    }

    fn on_error(&mut self, message: Option<String>) {
        self.receive_error(message.as_deref());
    }

    fn on_fatal_error(&mut self, error: &TransportError) {
        self.fatal(&error.to_string());
    }

    fn on_closed(&mut self) {
        self.fetching = false;
    }
}
