use super::*;
use crate::config::Timeouts;
use crate::net::api::SUMMARIZE_PATH;
use crate::state::summary::GENERIC_ERROR_MESSAGE;
use crate::state::{Notice, PageControls, SentenceCount};
use crate::test_server::{self, SocketScript};
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use frames::ResultItem;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

async fn echo_summarize(Json(request): Json<SummarizeRequest>) -> (StatusCode, Json<Vec<ResultItem>>) {
    let count = usize::try_from(request.sentences_per_group).unwrap_or(0);
    let items = (0..count)
        .map(|i| ResultItem::text(format!("group {i}"), format!("summary {i}")))
        .collect();
    (StatusCode::CREATED, Json(items))
}

fn config_for(api_url: &str, socket_url: &str) -> ClientConfig {
    ClientConfig::from_parts(Some(socket_url.to_owned()), Some(api_url.to_owned()), Timeouts::default())
        .expect("config")
}

fn form(text: &str, count: &str) -> FormState {
    FormState::new(text, SentenceCount::from_input(count))
}

/// Apply events until the current request closes.
async fn drain(summarizer: &mut Summarizer) -> Vec<TransportEvent> {
    let mut events = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(5), summarizer.next_event())
            .await
            .expect("event timed out")
            .expect("channel closed");
        let closed = event == TransportEvent::Closed;
        events.push(event);
        if closed {
            return events;
        }
    }
}

// =============================================================
// submit
// =============================================================

#[tokio::test]
async fn submit_without_text_sends_nothing() {
    let mut summarizer = Summarizer::new(ClientConfig::default(), TransportKind::Http, 10);
    assert!(!summarizer.submit(&FormState::default()));
    assert!(!summarizer.submit(&form("", "4")));
    assert!(summarizer.is_idle());
    assert!(!summarizer.state().fetching);
    assert!(timeout(Duration::from_millis(50), summarizer.next_event()).await.is_err());
}

#[test]
fn transport_kind_selects_window_policy() {
    assert_eq!(TransportKind::Http.window_policy(), WindowPolicy::Live);
    assert_eq!(TransportKind::Stream.window_policy(), WindowPolicy::FreezeOnFirstArrival);
}

// =============================================================
// HTTP transport
// =============================================================

#[tokio::test]
async fn http_reply_fills_first_page() {
    let base = test_server::spawn(Router::new().route(SUMMARIZE_PATH, post(echo_summarize))).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Http, 10);

    assert!(summarizer.submit(&form("Some text.", "12")));
    assert!(summarizer.state().fetching);
    drain(&mut summarizer).await;

    let results = &summarizer.state().results;
    assert_eq!(results.pagination().total, 12);
    assert_eq!(results.visible_window(), &results.items()[0..10]);
    assert_eq!(
        results.controls(),
        Some(PageControls { prev_enabled: false, next_enabled: true })
    );
    assert!(summarizer.is_idle());
}

#[tokio::test]
async fn http_failure_shows_generic_notice() {
    let router = Router::new().route(SUMMARIZE_PATH, post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = test_server::spawn(router).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Http, 10);

    summarizer.submit(&form("Some text.", "4"));
    drain(&mut summarizer).await;

    let state = summarizer.state_mut();
    assert!(state.results.is_empty());
    assert!(!state.fetching);
    assert_eq!(state.take_notices(), vec![Notice::error(GENERIC_ERROR_MESSAGE)]);
}

#[tokio::test]
async fn superseded_http_reply_is_discarded() {
    let base = test_server::spawn(Router::new().route(SUMMARIZE_PATH, post(echo_summarize))).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Http, 10);

    summarizer.submit(&form("first", "3"));
    summarizer.submit(&form("second", "5"));
    drain(&mut summarizer).await;

    assert_eq!(summarizer.state().results.pagination().total, 5);
}

#[tokio::test]
async fn resubmit_resets_paging() {
    let base = test_server::spawn(Router::new().route(SUMMARIZE_PATH, post(echo_summarize))).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Http, 10);

    summarizer.submit(&form("text", "25"));
    drain(&mut summarizer).await;
    summarizer.state_mut().results.go_next();
    assert_eq!(summarizer.state().results.pagination().offset, 10);

    summarizer.submit(&form("text", "25"));
    assert_eq!(summarizer.state().results.pagination().offset, 0);
    assert!(summarizer.state().results.is_empty());
    drain(&mut summarizer).await;
    assert_eq!(summarizer.state().results.pagination().total, 25);
}

// =============================================================
// Streamed transport
// =============================================================

fn page(range: std::ops::Range<usize>) -> String {
    let items: Vec<ResultItem> = range
        .map(|i| ResultItem::text(format!("group {i}"), format!("summary {i}")))
        .collect();
    json!(["summary", {"result": items}]).to_string()
}

#[tokio::test]
async fn streamed_pages_accumulate_without_reflow() {
    let first = page(0..5);
    let second = page(5..12);
    let base = test_server::spawn_socket(SocketScript::replying(&[&first, &second])).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Stream, 10);

    summarizer.submit(&form("text", "4"));

    let event = timeout(Duration::from_secs(5), summarizer.next_event()).await.expect("first page");
    assert!(matches!(event, Some(TransportEvent::Items(ref items)) if items.len() == 5));
    let captured = summarizer.state().results.visible_window().to_vec();

    drain(&mut summarizer).await;
    let results = &summarizer.state().results;
    assert_eq!(results.pagination().total, 12);
    assert_eq!(results.visible_window(), captured.as_slice());
    assert!(summarizer.is_idle());
}

#[tokio::test]
async fn streamed_service_error_keeps_results() {
    let first = page(0..3);
    let script = SocketScript::replying(&[&first, r#"["summary", {"error": {"message": "quota exceeded"}}]"#]);
    let base = test_server::spawn_socket(script).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Stream, 10);

    summarizer.submit(&form("text", "4"));
    drain(&mut summarizer).await;

    let state = summarizer.state_mut();
    assert_eq!(state.results.pagination().total, 3);
    assert_eq!(state.take_notices(), vec![Notice::error("quota exceeded")]);
}

#[tokio::test]
async fn streamed_connection_failure_shows_generic_notice() {
    let base = test_server::closed_url().await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Stream, 10);

    summarizer.submit(&form("text", "4"));
    drain(&mut summarizer).await;

    let state = summarizer.state_mut();
    assert!(state.results.is_empty());
    assert!(!state.fetching);
    assert_eq!(state.take_notices(), vec![Notice::error(GENERIC_ERROR_MESSAGE)]);
}

#[tokio::test]
async fn streamed_resubmit_uses_fresh_connection() {
    let first = page(0..2);
    let script = SocketScript::replying(&[&first]);
    let base = test_server::spawn_socket(script.clone()).await;
    let mut summarizer = Summarizer::new(config_for(&base, &base), TransportKind::Stream, 10);

    summarizer.submit(&form("one", "4"));
    drain(&mut summarizer).await;
    summarizer.submit(&form("two", "4"));
    drain(&mut summarizer).await;

    assert_eq!(summarizer.state().results.pagination().total, 2);
    let received = script.received();
    assert_eq!(received.len(), 2);
    assert!(received[1].contains("\"two\""));
}

#[tokio::test]
async fn streamed_task_connects_after_previous_session_closes() {
    let script = SocketScript::replying(&[]);
    let base = test_server::spawn_socket(script.clone()).await;
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let previous = tokio::spawn(async move {
        let _ = release_rx.await;
    });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let request = SummarizeRequest { text: "text".to_owned(), sentences_per_group: 4 };
    let _task = spawn_transport(
        TransportKind::Stream,
        config_for(&base, &base),
        request,
        EventSender::new(1, tx),
        Some(previous),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(script.received().is_empty());
    assert!(rx.try_recv().is_err());

    release_tx.send(()).unwrap();
    let tagged = timeout(Duration::from_secs(5), rx.recv()).await.expect("event timed out");
    assert_eq!(tagged, Some((1, TransportEvent::Closed)));
    assert_eq!(script.received().len(), 1);
}
