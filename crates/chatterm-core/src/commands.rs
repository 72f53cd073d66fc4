//! Chat-loop command interpretation
//!
//! Operator lines are compared case-insensitively with diacritics stripped, so
//! `"Exit"`, `" EXIT "` and `"éxit"` all match `exit`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::InteractionConfig;

/// What an operator line means inside a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Leave the chat and return to the main menu
    Exit,
    /// Grow the history view and re-render it
    MoreHistory,
    /// Blank line; nothing to send
    Empty,
    /// Send the line verbatim
    Send(String),
}

/// Trim, lowercase and strip combining marks after canonical decomposition
pub fn normalize(input: &str) -> String {
    input
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Control words recognised by the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    exit_words: Vec<String>,
    more_history_token: Option<String>,
}

impl CommandSet {
    pub fn new<I, S>(exit_words: I, more_history_token: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exit_words: exit_words
                .into_iter()
                .map(|word| normalize(word.as_ref()))
                .filter(|word| !word.is_empty())
                .collect(),
            more_history_token: more_history_token.map(normalize).filter(|token| !token.is_empty()),
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(&config.exit_words, config.more_history_token.as_deref())
    }

    /// Exit words in their normalized form, for prompts
    pub fn exit_words(&self) -> &[String] {
        &self.exit_words
    }

    pub fn interpret(&self, line: &str) -> ChatCommand {
        let normalized = normalize(line);

        if normalized.is_empty() {
            ChatCommand::Empty
        } else if self.exit_words.iter().any(|word| *word == normalized) {
            ChatCommand::Exit
        } else if self.more_history_token.as_deref() == Some(normalized.as_str()) {
            ChatCommand::MoreHistory
        } else {
            ChatCommand::Send(line.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn test_normalize_strips_case_space_and_accents() {
        assert_eq!(normalize("  Más  "), "mas");
        assert_eq!(normalize("SALÍR"), "salir");
        assert_eq!(normalize(".."), "..");
    }

    #[test]
    fn test_exit_words_match_normalized() {
        let commands = CommandSet::from_config(&InteractionConfig::for_profile(Profile::Basic));
        for line in ["<", "exit", " EXIT ", "Éxit", ".."] {
            assert_eq!(commands.interpret(line), ChatCommand::Exit, "line {:?}", line);
        }
        assert_eq!(commands.interpret("back"), ChatCommand::Send("back".to_string()));
    }

    #[test]
    fn test_more_history_only_when_configured() {
        let extended = CommandSet::from_config(&InteractionConfig::for_profile(Profile::Extended));
        assert_eq!(extended.interpret("More"), ChatCommand::MoreHistory);
        assert_eq!(extended.interpret("back"), ChatCommand::Exit);

        let basic = CommandSet::from_config(&InteractionConfig::for_profile(Profile::Basic));
        assert_eq!(basic.interpret("more"), ChatCommand::Send("more".to_string()));
    }

    #[test]
    fn test_send_keeps_line_verbatim() {
        let commands = CommandSet::new(["exit"], None);
        assert_eq!(
            commands.interpret("  Hello, World "),
            ChatCommand::Send("  Hello, World ".to_string())
        );
        assert_eq!(commands.interpret("   "), ChatCommand::Empty);
    }
}
