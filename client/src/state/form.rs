//! Summarize form input: source text and the sentences-per-group field.
//!
//! The sentence count is kept exactly as typed so an empty field is a valid
//! intermediate state; coercion to an integer only happens at submit time.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use frames::SummarizeRequest;

/// Initial sentences-per-group value.
pub const DEFAULT_SENTENCE_COUNT: i64 = 4;

/// Raw contents of the sentences-per-group field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceCount(String);

impl Default for SentenceCount {
    fn default() -> Self {
        Self(DEFAULT_SENTENCE_COUNT.to_string())
    }
}

impl SentenceCount {
    /// Accept whatever the user typed, including the empty string.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }

    /// Integer sent to the service. Empty or non-numeric input becomes 0 and
    /// fractional input is truncated toward zero.
    #[must_use]
    pub fn coerce(&self) -> i64 {
        if let Ok(value) = self.0.parse::<i64>() {
            return value;
        }
        match self.0.parse::<f64>() {
            #[allow(clippy::cast_possible_truncation)]
            Ok(value) if value.is_finite() => value.trunc() as i64,
            _ => 0,
        }
    }
}

/// The summarize form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub text: Option<String>,
    pub sentence_count: SentenceCount,
}

impl FormState {
    #[must_use]
    pub fn new(text: impl Into<String>, sentence_count: SentenceCount) -> Self {
        Self {
            text: Some(text.into()),
            sentence_count,
        }
    }

    /// The request to send, or `None` when there is no text to summarize.
    #[must_use]
    pub fn submission(&self) -> Option<SummarizeRequest> {
        let text = self.text.as_deref().filter(|t| !t.is_empty())?;
        Some(SummarizeRequest {
            text: text.to_owned(),
            sentences_per_group: self.sentence_count.coerce(),
        })
    }
}
