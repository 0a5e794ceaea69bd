use super::*;

// =============================================================
// SentenceCount
// =============================================================

#[test]
fn sentence_count_defaults_to_four() {
    let count = SentenceCount::default();
    assert_eq!(count, SentenceCount::from_input("4"));
    assert_eq!(count.coerce(), 4);
}

#[test]
fn sentence_count_accepts_empty_input() {
    let count = SentenceCount::from_input("");
    assert_ne!(count, SentenceCount::default());
    assert_eq!(count.coerce(), 0);
}

#[test]
fn sentence_count_non_numeric_coerces_to_zero() {
    assert_eq!(SentenceCount::from_input("abc").coerce(), 0);
    assert_eq!(SentenceCount::from_input("NaN").coerce(), 0);
    assert_eq!(SentenceCount::from_input("inf").coerce(), 0);
}

#[test]
fn sentence_count_parses_integers_and_truncates_fractions() {
    assert_eq!(SentenceCount::from_input(" 7 ").coerce(), 7);
    assert_eq!(SentenceCount::from_input("2.9").coerce(), 2);
    assert_eq!(SentenceCount::from_input("-3").coerce(), -3);
}

// =============================================================
// FormState::submission
// =============================================================

#[test]
fn submission_without_text_is_none() {
    assert!(FormState::default().submission().is_none());
}

#[test]
fn submission_with_empty_text_is_none() {
    let form = FormState::new("", SentenceCount::default());
    assert!(form.submission().is_none());
}

#[test]
fn submission_carries_text_and_coerced_count() {
    let form = FormState::new("First. Second.", SentenceCount::from_input(""));
    let request = form.submission().expect("request");
    assert_eq!(request.text, "First. Second.");
    assert_eq!(request.sentences_per_group, 0);
}
