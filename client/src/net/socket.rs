//! Streamed transport: a websocket session that delivers results in pages.
//!
//! The connection is explicit. [`SocketClient::connect`] tears down any
//! previous connection, opens a fresh one and waits for the server's
//! `connect` handshake before anything is emitted. [`run_session`] drives one
//! summarize request from emit until the server closes the connection, which
//! is the implicit end of results.
//!
//! ERROR HANDLING
//! ==============
//! Socket, decode and timeout failures end the session and are reported
//! through `on_fatal_error`. Service-reported errors (`summary` with `error`,
//! or an `error` event) are reported through `on_error` and the session
//! keeps reading.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use frames::{EVENT_CONNECT, EVENT_ERROR, EVENT_SUMMARY, Frame, SummarizeRequest};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::events::SummaryEvents;
use super::types::TransportError;
use crate::config::Timeouts;

/// Path of the websocket endpoint, relative to the socket base URL.
pub const SOCKET_PATH: &str = "/ws";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Resolve the websocket URL for a socket base URL.
///
/// # Errors
///
/// Returns [`TransportError::InvalidBaseUrl`] for unsupported schemes.
pub fn socket_url(base_url: &str) -> Result<String, TransportError> {
    let base_url = base_url.trim_end_matches('/');
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{rest}{SOCKET_PATH}"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{rest}{SOCKET_PATH}"));
    }
    if base_url.starts_with("ws://") || base_url.starts_with("wss://") {
        return Ok(format!("{base_url}{SOCKET_PATH}"));
    }

    Err(TransportError::InvalidBaseUrl(base_url.to_owned()))
}

/// A single websocket connection to the summarization service.
pub struct SocketClient {
    url: String,
    timeouts: Timeouts,
    stream: Option<WsStream>,
}

impl SocketClient {
    /// Build a disconnected client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidBaseUrl`] for unsupported schemes.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, TransportError> {
        Ok(Self {
            url: socket_url(base_url)?,
            timeouts,
            stream: None,
        })
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a fresh connection and wait for the server handshake.
    ///
    /// Any existing connection is closed first.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Socket`] if the connection fails,
    /// [`TransportError::Timeout`] if the handshake does not arrive in time,
    /// and [`TransportError::ClosedBeforeHandshake`] if the server hangs up.
    pub async fn connect(&mut self) -> Result<(), TransportError> {
        self.disconnect().await;

        let limit = self.timeouts.connect();
        let (mut stream, _) = tokio::time::timeout(limit, connect_async(self.url.as_str()))
            .await
            .map_err(|_| TransportError::Timeout("websocket connect"))??;

        tokio::time::timeout(limit, wait_for_handshake(&mut stream))
            .await
            .map_err(|_| TransportError::Timeout("connect handshake"))??;

        tracing::info!(url = %self.url, "socket connected");
        self.stream = Some(stream);
        Ok(())
    }

    /// Close the connection if one is open. Close errors are ignored.
    pub async fn disconnect(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        if let Err(error) = stream.close(None).await {
            tracing::debug!(%error, "socket close failed");
        }
        tracing::info!(url = %self.url, "socket disconnected");
    }

    /// Send one event frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClosedBeforeHandshake`] when not connected
    /// and [`TransportError::Socket`] if the write fails.
    pub async fn emit(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::ClosedBeforeHandshake)?;
        tracing::debug!(event = %frame.event, "socket send frame");
        stream
            .send(Message::Text(frames::encode_frame(frame).into()))
            .await?;
        Ok(())
    }

    /// Wait for the next event frame. `Ok(None)` means the server closed the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] when no frame arrives within the
    /// request timeout, [`TransportError::Socket`] on read failure and
    /// [`TransportError::Decode`] for malformed frames.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        let limit = self.timeouts.request();
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };
        let frame = tokio::time::timeout(limit, recv_frame(stream))
            .await
            .map_err(|_| TransportError::Timeout("summary frame"))??;
        if frame.is_none() {
            self.stream = None;
        }
        Ok(frame)
    }
}

/// Run one streamed summarize session, reporting everything to `events`.
///
/// Always ends with `on_closed`, and leaves the client disconnected.
pub async fn run_session<E: SummaryEvents>(
    client: &mut SocketClient,
    request: &SummarizeRequest,
    events: &mut E,
) {
    if let Err(error) = stream_results(client, request, events).await {
        tracing::debug!(%error, "summarize session failed");
        events.on_fatal_error(&error);
    }
    client.disconnect().await;
    events.on_closed();
}

async fn stream_results<E: SummaryEvents>(
    client: &mut SocketClient,
    request: &SummarizeRequest,
    events: &mut E,
) -> Result<(), TransportError> {
    client.connect().await?;
    tracing::info!(sentences_per_group = request.sentences_per_group, "summarize session started");
    client.emit(&Frame::summarize(request)?).await?;

    while let Some(frame) = client.next_frame().await? {
        dispatch_frame(&frame, events)?;
    }
    Ok(())
}

/// Route one server frame to the matching callback.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] when a `summary` payload is malformed.
pub fn dispatch_frame<E: SummaryEvents>(frame: &Frame, events: &mut E) -> Result<(), TransportError> {
    match frame.event.as_str() {
        EVENT_SUMMARY => {
            let payload = frame.summary_payload()?;
            if let Some(error) = payload.error {
                events.on_error(error.message().map(ToOwned::to_owned));
                return Ok(());
            }
            let items = payload.result.unwrap_or_default();
            tracing::debug!(count = items.len(), "summary page received");
            events.on_items(items);
        }
        EVENT_ERROR => {
            tracing::warn!(payload = %frame.data, "server error event");
            events.on_error(None);
        }
        other => {
            tracing::debug!(event = other, "ignoring socket event");
        }
    }
    Ok(())
}

async fn wait_for_handshake(stream: &mut WsStream) -> Result<(), TransportError> {
    loop {
        let Some(frame) = recv_frame(stream).await? else {
            return Err(TransportError::ClosedBeforeHandshake);
        };
        if frame.event == EVENT_CONNECT {
            return Ok(());
        }
        tracing::debug!(event = %frame.event, "frame before handshake ignored");
    }
}

async fn recv_frame(stream: &mut WsStream) -> Result<Option<Frame>, TransportError> {
    loop {
        let Some(message) = stream.next().await else {
            return Ok(None);
        };
        match message {
            Ok(Message::Text(text)) => return Ok(Some(frames::decode_frame(text.as_str())?)),
            Ok(Message::Close(_)) => return Ok(None),
            Ok(_) => {}
            Err(error) if is_disconnect(&error) => return Ok(None),
            Err(error) => return Err(error.into()),
        }
    }
}

/// Errors that only mean the peer went away.
fn is_disconnect(error: &WsError) -> bool {
    matches!(
        error,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}
