//! Networking modules for the two summarize transports.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the single request/response call, `socket` manages the
//! streamed websocket session, `events` defines the sink both report into,
//! and `types` holds the shared error and event types.

pub mod api;
pub mod events;
pub mod socket;
pub mod types;

pub use events::{EventSender, SummaryEvents};
pub use types::{TaggedEvent, TransportError, TransportEvent};
