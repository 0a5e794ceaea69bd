//! Shared wire model for the summarization service.
//!
//! This crate owns the payload shapes used by both transports (the HTTP
//! request/response call and the streamed websocket session) and the event
//! frame codec used on the socket. Summaries and item errors stay flexible
//! (`serde_json::Value`) because the service may return structured values.
//!
//! FRAME ENCODING
//! ==============
//! Each websocket text message carries one named event encoded as the JSON
//! array `[name, payload]`. A frame without a payload encodes as `[name]` and
//! decodes with a `null` payload.
//!
//! ERROR FIELDS
//! ============
//! The service marks failures with a loosely typed `error` field. Only a
//! truthy value counts: `null`, `false`, `0` and `""` are read as absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event emitted by the server once the connection handshake completes.
pub const EVENT_CONNECT: &str = "connect";
/// Client-to-server event that starts a summarization session.
pub const EVENT_SUMMARIZE: &str = "summarize";
/// Server-to-client event carrying one page of results (or an error).
pub const EVENT_SUMMARY: &str = "summary";
/// Server-to-client event reporting a session-level failure.
pub const EVENT_ERROR: &str = "error";

/// Error returned by [`decode_frame`] and the typed payload accessors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The message text is not valid JSON.
    #[error("failed to decode frame json: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON value is not an array.
    #[error("frame is not a json array")]
    NotAnArray,
    /// The array is empty or its first element is not a string.
    #[error("frame is missing an event name")]
    MissingEventName,
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Body of a summarize request, shared by both transports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// The full source text to split and summarize.
    pub text: String,
    /// Number of sentences per group. Zero lets the service choose.
    pub sentences_per_group: i64,
}

/// One summarized sentence group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// The source-text chunk this item summarizes.
    #[serde(default)]
    pub group: String,
    /// Plain-text summary, or an opaque structured value.
    #[serde(default)]
    pub summary: Value,
    /// Present only when summarizing this group failed.
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ResultItem {
    /// Build a successful item with a plain-text summary.
    #[must_use]
    pub fn text(group: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            summary: Value::String(summary.into()),
            error: None,
        }
    }

    /// Returns the summary when it is plain text.
    #[must_use]
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_str()
    }
}

/// Opaque per-item error reported by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorInfo(pub Value);

impl ErrorInfo {
    /// Short status of the failure, e.g. `"429"` or `"RATE_LIMITED"`.
    ///
    /// Only non-empty strings and non-zero numbers count.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        match self.0.get("status").filter(|v| is_truthy(v))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Message nested under `data.message`.
    #[must_use]
    pub fn data_message(&self) -> Option<&str> {
        self.0
            .get("data")?
            .get("message")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Top-level `message` field.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.get("message")?.as_str().filter(|s| !s.is_empty())
    }
}

/// `null`, `false`, zero and `""` are falsy; everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_error<'de, D>(deserializer: D) -> Result<Option<ErrorInfo>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value).then_some(ErrorInfo(value)))
}

/// Payload of a streamed `summary` event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    /// Items in this page. Absent means an empty page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<ResultItem>>,
    /// Set when the service reports a failure for this message.
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

// =============================================================================
// FRAME
// =============================================================================

/// A single named event on the streamed wire protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Event name, e.g. `"summary"`.
    pub event: String,
    /// Arbitrary JSON payload (`null` when absent).
    pub data: Value,
}

impl Frame {
    /// Build a frame from an event name and a serializable payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the payload cannot be serialized.
    pub fn new<T: Serialize>(event: &str, data: &T) -> Result<Self, CodecError> {
        Ok(Self {
            event: event.to_owned(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Build the client `summarize` frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the request cannot be serialized.
    pub fn summarize(request: &SummarizeRequest) -> Result<Self, CodecError> {
        Self::new(EVENT_SUMMARIZE, request)
    }

    /// Interpret the payload as a [`SummaryPayload`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] when the payload does not match the schema.
    pub fn summary_payload(&self) -> Result<SummaryPayload, CodecError> {
        if self.data.is_null() {
            return Ok(SummaryPayload::default());
        }
        Ok(SummaryPayload::deserialize(&self.data)?)
    }
}

/// Encode a frame into its JSON text form.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let parts = if frame.data.is_null() {
        vec![Value::String(frame.event.clone())]
    } else {
        vec![Value::String(frame.event.clone()), frame.data.clone()]
    };
    Value::Array(parts).to_string()
}

/// Decode a JSON text message into a frame.
///
/// Extra trailing array elements are ignored.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed text, [`CodecError::NotAnArray`]
/// when the top-level value is not an array, and
/// [`CodecError::MissingEventName`] when the event name is absent.
pub fn decode_frame(text: &str) -> Result<Frame, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(parts) = value else {
        return Err(CodecError::NotAnArray);
    };
    let mut parts = parts.into_iter();
    let Some(Value::String(event)) = parts.next() else {
        return Err(CodecError::MissingEventName);
    };
    let data = parts.next().unwrap_or(Value::Null);
    Ok(Frame { event, data })
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
