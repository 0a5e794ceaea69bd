//! Plain-text rendering of the visible page, controls and notices.
//!
//! Item precedence: an item's `error` replaces its summary (short status,
//! then `data.message`, then the raw error JSON); structured summaries are
//! pretty-printed rather than flattened.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use frames::ResultItem;
use serde_json::Value;

use crate::state::{Notice, PageControls, ResultBuffer};

pub const SUMMARIZE_LABEL: &str = "Summarize";
pub const FETCHING_LABEL: &str = "Summarizing...";

/// Label of the submit action while idle or fetching.
#[must_use]
pub fn submit_label(fetching: bool) -> &'static str {
    if fetching { FETCHING_LABEL } else { SUMMARIZE_LABEL }
}

/// Text shown in the summary column for one item.
#[must_use]
pub fn summary_text(item: &ResultItem) -> String {
    if let Some(error) = &item.error {
        if let Some(status) = error.status() {
            return status;
        }
        if let Some(message) = error.data_message() {
            return message.to_owned();
        }
        return pretty(&error.0);
    }
    match &item.summary {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => item.summary.to_string(),
        structured => pretty(structured),
    }
}

/// One group/summary pair, numbered from 1 across the whole result set.
#[must_use]
pub fn render_item(number: usize, item: &ResultItem) -> String {
    format!(
        "Group {number}:\n{}\nSummary {number}:\n{}\n",
        item.group,
        summary_text(item)
    )
}

/// Prev/Next line; disabled buttons are still drawn, in parentheses.
#[must_use]
pub fn render_controls(controls: PageControls) -> String {
    let prev = if controls.prev_enabled { "[Prev]" } else { "(Prev)" };
    let next = if controls.next_enabled { "[Next]" } else { "(Next)" };
    format!("{prev}  {next}")
}

/// The visible window, a position line, and controls when needed.
#[must_use]
pub fn render_page(results: &ResultBuffer) -> String {
    let window = results.visible_window();
    let pagination = results.pagination();
    let mut out = String::new();

    for (idx, item) in window.iter().enumerate() {
        out.push_str(&render_item(pagination.offset + idx + 1, item));
        out.push('\n');
    }

    if !window.is_empty() {
        let first = pagination.offset + 1;
        let last = pagination.offset + window.len();
        let _ = writeln!(out, "Showing {first}-{last} of {}", pagination.total);
    }
    if let Some(controls) = results.controls() {
        out.push_str(&render_controls(controls));
        out.push('\n');
    }
    out
}

#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    format!("{}: {}", notice.title, notice.text)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
