//! Terminal loops that drive a [`Summarizer`] and print its pages.
//!
//! The interactive pager reads commands line by line. When its input ends
//! while a request is still running, it falls back to waiting for the request
//! to close and printing the final page, so piped or detached runs still get
//! their results.

#[cfg(test)]
#[path = "pager_test.rs"]
mod pager_test;

use std::io;

use client::net::TransportEvent;
use client::render::{render_notice, render_page, submit_label};
use client::state::FormState;
use client::{Summarizer, TransportKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{HELP, PagerCommand};

/// Status line printed when a request starts.
pub fn submit_status(summarizer: &Summarizer) -> String {
    let transport = match summarizer.kind() {
        TransportKind::Http => "http",
        TransportKind::Stream => "stream",
    };
    format!("{} ({transport})", submit_label(true))
}

/// Wait for the current request to close, then print the first visible page.
pub async fn run_once(summarizer: &mut Summarizer) {
    while let Some(event) = summarizer.next_event().await {
        flush_notices(summarizer);
        if event == TransportEvent::Closed {
            break;
        }
    }
    print!("{}", render_page(&summarizer.state().results));
}

/// Interactive pager over `input`, one command per line.
pub async fn run_pager<R>(summarizer: &mut Summarizer, form: &FormState, input: R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    eprintln!("{HELP}");

    loop {
        tokio::select! {
            event = summarizer.next_event() => {
                let Some(event) = event else { break };
                flush_notices(summarizer);
                if !matches!(event, TransportEvent::Error(_) | TransportEvent::Fatal(_)) {
                    show_page(summarizer);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if !summarizer.is_idle() {
                        tracing::debug!("input closed with a request in flight");
                        run_once(summarizer).await;
                    }
                    break;
                };
                match PagerCommand::parse(&line) {
                    Some(PagerCommand::Next) => {
                        summarizer.state_mut().results.go_next();
                        show_page(summarizer);
                    }
                    Some(PagerCommand::Prev) => {
                        summarizer.state_mut().results.go_prev();
                        show_page(summarizer);
                    }
                    Some(PagerCommand::Resubmit) => {
                        if summarizer.submit(form) {
                            eprintln!("{}", submit_status(summarizer));
                        }
                    }
                    Some(PagerCommand::Help) => eprintln!("{HELP}"),
                    Some(PagerCommand::Quit) => break,
                    None if line.trim().is_empty() => show_page(summarizer),
                    None => eprintln!("unknown command `{}`; {HELP}", line.trim()),
                }
            }
        }
    }
    Ok(())
}

fn show_page(summarizer: &Summarizer) {
    let state = summarizer.state();
    println!("{}", "-".repeat(40));
    print!("{}", render_page(&state.results));
    if state.fetching {
        println!("{}", submit_label(true));
    }
}

fn flush_notices(summarizer: &mut Summarizer) {
    for notice in summarizer.state_mut().take_notices() {
        eprintln!("{}", render_notice(&notice));
    }
}
