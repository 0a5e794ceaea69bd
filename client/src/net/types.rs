//! Transport error and event types shared by the HTTP and socket transports.

use frames::ResultItem;

/// Errors produced while talking to the summarization service.
///
/// None of these escape to the user directly; the session layer turns every
/// one of them into a single generic notice.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL has a scheme the transport cannot use.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built or the request failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than `201 Created`.
    #[error("unexpected http status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("invalid response payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Connecting to, reading from or writing to the websocket failed.
    #[error("websocket failed: {0}")]
    Socket(Box<tokio_tungstenite::tungstenite::Error>),

    /// The socket closed before the server completed its handshake.
    #[error("websocket closed before handshake")]
    ClosedBeforeHandshake,

    /// A socket message could not be decoded into an event frame.
    #[error("frame decode failed: {0}")]
    Decode(#[from] frames::CodecError),

    /// Waiting on the service took longer than the configured timeout.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Socket(Box::new(error))
    }
}

/// One message from a transport task to the session event loop.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    /// A page of results arrived.
    Items(Vec<ResultItem>),
    /// The service reported an error, with its message when it sent one.
    Error(Option<String>),
    /// The transport failed; carries the error text for logging only.
    Fatal(String),
    /// The transport finished (reply received or connection closed).
    Closed,
}

/// A transport event tagged with the request generation that produced it.
pub type TaggedEvent = (u64, TransportEvent);
