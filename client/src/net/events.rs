//! The injected sink transports report into.
//!
//! DESIGN
//! ======
//! Transports never touch result state directly. They call into a
//! [`SummaryEvents`] implementation, which is either the state itself (tests,
//! synchronous use) or an [`EventSender`] that forwards into the session's
//! single-writer event loop.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use frames::ResultItem;
use tokio::sync::mpsc;

use super::types::{TaggedEvent, TransportError, TransportEvent};

/// Callbacks a transport drives while a summarize request is in flight.
pub trait SummaryEvents {
    /// A page of results arrived.
    fn on_items(&mut self, items: Vec<ResultItem>);

    /// The service reported an error, with its message when it sent one.
    fn on_error(&mut self, message: Option<String>);

    /// The transport itself failed.
    fn on_fatal_error(&mut self, error: &TransportError);

    /// The transport finished: the reply arrived or the connection closed.
    fn on_closed(&mut self) {}
}

/// Collects events in order.
impl SummaryEvents for Vec<TransportEvent> {
    fn on_items(&mut self, items: Vec<ResultItem>) {
        self.push(TransportEvent::Items(items));
    }

    fn on_error(&mut self, message: Option<String>) {
        self.push(TransportEvent::Error(message));
    }

    fn on_fatal_error(&mut self, error: &TransportError) {
        self.push(TransportEvent::Fatal(error.to_string()));
    }

    fn on_closed(&mut self) {
        self.push(TransportEvent::Closed);
    }
}

/// Forwards events into a session channel, tagged with a request generation.
#[derive(Clone, Debug)]
pub struct EventSender {
    generation: u64,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSender {
    #[must_use]
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { generation, tx }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn send(&self, event: TransportEvent) {
        if self.tx.send((self.generation, event)).is_err() {
            tracing::debug!(generation = self.generation, "session receiver dropped; event discarded");
        }
    }
}

impl SummaryEvents for EventSender {
    fn on_items(&mut self, items: Vec<ResultItem>) {
        self.send(TransportEvent::Items(items));
    }

    fn on_error(&mut self, message: Option<String>) {
        self.send(TransportEvent::Error(message));
    }

    fn on_fatal_error(&mut self, error: &TransportError) {
        self.send(TransportEvent::Fatal(error.to_string()));
    }

    fn on_closed(&mut self) {
        self.send(TransportEvent::Closed);
    }
}
