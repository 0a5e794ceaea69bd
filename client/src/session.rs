//! Session controller: submits requests and owns the single-writer loop.
//!
//! DESIGN
//! ======
//! Transports run as spawned tasks and only send tagged events through a
//! channel. [`Summarizer::next_event`] is the one place those events mutate
//! [`SummaryState`]. Every submit bumps a generation counter, and events from
//! older generations are dropped, so at most one request's results are ever
//! being accumulated.
//!
//! The streaming transport is asked to close its connection, and the next
//! streaming task waits for that close to finish before it connects. The HTTP
//! transport has no cancellation; a superseded reply is simply discarded when
//! it arrives.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::SummarizeRequest;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::net::api::{ApiClient, run_summarize};
use crate::net::socket::{SocketClient, run_session};
use crate::net::{EventSender, SummaryEvents, TaggedEvent, TransportEvent};
use crate::state::{FormState, SummaryState, WindowPolicy};

/// Which transport carries summarize requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportKind {
    /// One `POST`, full result set in the reply.
    #[default]
    Http,
    /// Websocket session streaming pages of results.
    Stream,
}

impl TransportKind {
    /// Window policy that matches the transport's delivery pattern.
    #[must_use]
    pub fn window_policy(self) -> WindowPolicy {
        match self {
            Self::Http => WindowPolicy::Live,
            Self::Stream => WindowPolicy::FreezeOnFirstArrival,
        }
    }
}

struct ActiveTask {
    handle: JoinHandle<()>,
    cancel: Option<oneshot::Sender<()>>,
}

impl ActiveTask {
    /// Ask the task to stop. Streaming tasks close their socket and their
    /// handle is returned so the caller can wait for the close. HTTP tasks
    /// keep running and their events go stale.
    fn cancel(mut self) -> Option<JoinHandle<()>> {
        let cancel = self.cancel.take()?;
        let _ = cancel.send(());
        Some(self.handle)
    }
}

/// Owns summary state and the transport task feeding it.
pub struct Summarizer {
    config: ClientConfig,
    kind: TransportKind,
    state: SummaryState,
    generation: u64,
    task: Option<ActiveTask>,
    tx: mpsc::UnboundedSender<TaggedEvent>,
    rx: mpsc::UnboundedReceiver<TaggedEvent>,
}

impl Summarizer {
    /// Build an idle controller with `limit` items per page.
    #[must_use]
    pub fn new(config: ClientConfig, kind: TransportKind, limit: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            kind,
            state: SummaryState::new(limit, kind.window_policy()),
            generation: 0,
            task: None,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    /// Mutable state, for paging and draining notices.
    pub fn state_mut(&mut self) -> &mut SummaryState {
        &mut self.state
    }

    /// True when no request is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let finished = self.task.as_ref().is_none_or(|task| task.handle.is_finished());
        finished && !self.state.fetching
    }

    /// Start a new request from `form`. Returns `false`, and changes nothing,
    /// when the form has no text.
    pub fn submit(&mut self, form: &FormState) -> bool {
        let Some(request) = form.submission() else {
            tracing::debug!("submit ignored: no text");
            return false;
        };

        let previous = self.task.take().and_then(ActiveTask::cancel);
        self.generation += 1;
        self.state.begin_request();
        tracing::info!(generation = self.generation, kind = ?self.kind, "submitting summarize request");

        let sender = EventSender::new(self.generation, self.tx.clone());
        self.task = Some(spawn_transport(self.kind, self.config.clone(), request, sender, previous));
        true
    }

    /// Wait for the next event of the current request and apply it.
    ///
    /// Stale events are skipped. While idle this never resolves, so callers
    /// select on it alongside their other inputs.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        loop {
            let (generation, event) = self.rx.recv().await?;
            if generation != self.generation {
                tracing::debug!(generation, current = self.generation, "dropping stale event");
                continue;
            }
            if event == TransportEvent::Closed {
                self.task = None;
            }
            self.state.apply(event.clone());
            return Some(event);
        }
    }
}

impl Drop for Summarizer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.cancel();
        }
    }
}

fn spawn_transport(
    kind: TransportKind,
    config: ClientConfig,
    request: SummarizeRequest,
    mut sender: EventSender,
    previous: Option<JoinHandle<()>>,
) -> ActiveTask {
    match kind {
        TransportKind::Http => {
            let handle = tokio::spawn(async move {
                match ApiClient::new(&config.api_url, config.timeouts) {
                    Ok(client) => run_summarize(&client, &request, &mut sender).await,
                    Err(error) => {
                        sender.on_fatal_error(&error);
                        sender.on_closed();
                    }
                }
            });
            ActiveTask { handle, cancel: None }
        }
        TransportKind::Stream => {
            let (cancel_tx, cancel_rx) = oneshot::channel();
            let handle = tokio::spawn(async move {
                if let Some(previous) = previous {
                    let _ = previous.await;
                }
                let mut client = match SocketClient::new(&config.socket_url, config.timeouts) {
                    Ok(client) => client,
                    Err(error) => {
                        sender.on_fatal_error(&error);
                        sender.on_closed();
                        return;
                    }
                };
                let generation = sender.generation();
                tokio::select! {
                    () = run_session(&mut client, &request, &mut sender) => {}
                    Ok(()) = cancel_rx => {
                        tracing::debug!(generation, "session superseded");
                    }
                }
                client.disconnect().await;
            });
            ActiveTask { handle, cancel: Some(cancel_tx) }
        }
    }
}
