//! In-process HTTP/websocket servers for transport tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::net::socket::SOCKET_PATH;

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub(crate) async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);
    format!("http://{addr}")
}

/// Websocket server behaviour for one test.
#[derive(Clone, Debug, Default)]
pub(crate) struct SocketScript {
    /// Send the `connect` event right after the upgrade.
    pub handshake: bool,
    /// Raw text messages sent after the first client message arrives.
    pub replies: Vec<String>,
    /// Every text message the server received, across connections.
    pub received: Arc<Mutex<Vec<String>>>,
}

impl SocketScript {
    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self {
            handshake: true,
            replies: replies.iter().map(|r| (*r).to_owned()).collect(),
            received: Arc::default(),
        }
    }

    pub(crate) fn received(&self) -> Vec<String> {
        self.received.lock().expect("received lock").clone()
    }
}

/// Serve `script` at the websocket path and return the socket base URL.
pub(crate) async fn spawn_socket(script: SocketScript) -> String {
    let router = Router::new()
        .route(SOCKET_PATH, get(upgrade))
        .with_state(script);
    spawn(router).await
}

async fn upgrade(ws: WebSocketUpgrade, State(script): State<SocketScript>) -> Response {
    ws.on_upgrade(move |socket| play(socket, script))
}

async fn play(mut socket: WebSocket, script: SocketScript) {
    if script.handshake {
        if socket.send(Message::Text(r#"["connect"]"#.to_owned().into())).await.is_err() {
            return;
        }
    } else {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                script.received.lock().expect("received lock").push(text.as_str().to_owned());
                break;
            }
            Some(Ok(Message::Close(_)) | Err(_)) | None => return,
            Some(Ok(_)) => {}
        }
    }

    for reply in &script.replies {
        if socket.send(Message::Text(reply.clone().into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}
