/// Chat commands understood by the bot. Anything else is ordinary
/// conversation and is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!ask <query>` — look up an entity in the knowledge graph.
    Ask(String),
    /// `!ask` with no query text after it.
    AskEmpty,
    /// `!help` — show the command overview.
    Help,
}

/// The literal prefix that marks a message as a lookup request.
pub const ASK_PREFIX: &str = "!ask";

const HELP_COMMAND: &str = "!help";

impl Command {
    /// Parse message text into a command. The prefix must be the whole
    /// first word: `!askew` is chatter, not a command.
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim_end() == HELP_COMMAND {
            return Some(Self::Help);
        }

        let rest = text.strip_prefix(ASK_PREFIX)?;

        // `!ask` with nothing after it, or only whitespace
        if rest.trim().is_empty() {
            return Some(Self::AskEmpty);
        }

        // A separator must follow the prefix, otherwise the first word
        // merely starts with `!ask`.
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }

        Some(Self::Ask(rest.trim().to_string()))
    }
}
