use super::*;

#[test]
fn parse_accepts_short_and_long_forms() {
    assert_eq!(PagerCommand::parse("n"), Some(PagerCommand::Next));
    assert_eq!(PagerCommand::parse("Next\n"), Some(PagerCommand::Next));
    assert_eq!(PagerCommand::parse(" p "), Some(PagerCommand::Prev));
    assert_eq!(PagerCommand::parse("resubmit"), Some(PagerCommand::Resubmit));
    assert_eq!(PagerCommand::parse("?"), Some(PagerCommand::Help));
    assert_eq!(PagerCommand::parse("exit"), Some(PagerCommand::Quit));
}

#[test]
fn parse_rejects_blank_and_unknown_input() {
    assert_eq!(PagerCommand::parse(""), None);
    assert_eq!(PagerCommand::parse("   "), None);
    assert_eq!(PagerCommand::parse("jump 3"), None);
}
