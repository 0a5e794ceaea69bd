//! # client
//!
//! Thin client for a sentence-group summarization service.
//!
//! Text goes out over one of two transports (a single HTTP request, or a
//! websocket session that streams pages of results) and comes back as
//! [`frames::ResultItem`]s. The crate accumulates them in a paginated buffer,
//! tracks the fetching flag and user-facing notices, and renders the visible
//! page as plain text.

pub mod config;
pub mod net;
pub mod render;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_server;

pub use config::ClientConfig;
pub use session::{Summarizer, TransportKind};
