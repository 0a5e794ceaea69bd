//! Pager commands read from stdin.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerCommand {
    Next,
    Prev,
    Resubmit,
    Help,
    Quit,
}

impl PagerCommand {
    /// Parse one input line. Blank lines and unknown words yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" => Some(Self::Prev),
            "r" | "resubmit" => Some(Self::Resubmit),
            "h" | "help" | "?" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub const HELP: &str = "commands: n = next page, p = previous page, r = resubmit, q = quit";
