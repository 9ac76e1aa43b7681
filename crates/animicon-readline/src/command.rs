//! Parsing of REPL input lines.

use animicon_core::session::SessionState;

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/describe", "/pick", "/copy", "/export", "/reset", "/state", "/help",
];

/// Which suggestion `/pick` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// 1-based position in the suggestion list.
    Index(usize),
    /// Literal suggestion text.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Describe(String),
    Pick(PickTarget),
    Copy,
    Export,
    Reset,
    State,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    /// Parses one input line. Text that is not a command is a description.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Command::Quit;
        }
        if !trimmed.starts_with('/') {
            return Command::Describe(trimmed.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            // A blank /describe still goes to the controller, which reports it.
            "/describe" => Command::Describe(rest.to_string()),
            "/pick" if rest.is_empty() => Command::Unknown("/pick needs a number or text".into()),
            "/pick" => match rest.parse::<usize>() {
                Ok(index) => Command::Pick(PickTarget::Index(index)),
                Err(_) => Command::Pick(PickTarget::Text(rest.to_string())),
            },
            "/copy" => Command::Copy,
            "/export" => Command::Export,
            "/reset" => Command::Reset,
            "/state" => Command::State,
            "/help" => Command::Help,
            other => Command::Unknown(format!("Unknown command: {other}")),
        }
    }
}

impl PickTarget {
    /// Maps the target onto a suggestion of `state`.
    ///
    /// Text is passed through untouched so the controller can reject
    /// suggestions that are not on offer.
    pub fn resolve(&self, state: &SessionState) -> Option<String> {
        match self {
            PickTarget::Index(index) => index
                .checked_sub(1)
                .and_then(|i| state.suggestions.get(i))
                .cloned(),
            PickTarget::Text(text) => Some(text.clone()),
        }
    }
}
