//! Interaction configuration
//!
//! The two client variants (a plain menu and an extended one with do-not-disturb,
//! presence and "more" history) are presets of one [`InteractionConfig`].

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::commands::normalize;
use crate::errors::ChatError;

// ----------------------------------------------------------------------------
// Profiles
// ----------------------------------------------------------------------------

/// Interaction preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// list / select / exit; only the active chat is ever shown
    Basic,
    /// adds the do-not-disturb toggle, presence and "more" history
    #[default]
    Extended,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Basic => f.write_str("basic"),
            Profile::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for Profile {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Profile::Basic),
            "extended" => Ok(Profile::Extended),
            other => Err(ChatError::Configuration(format!("Unknown profile: {}", other))),
        }
    }
}

// ----------------------------------------------------------------------------
// Interaction Configuration
// ----------------------------------------------------------------------------

/// Settings of the menu and chat loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Preset these settings were derived from
    pub profile: Profile,
    /// Words that leave the chat loop (compared normalized)
    pub exit_words: Vec<String>,
    /// Word that grows the history view, if enabled
    pub more_history_token: Option<String>,
    /// History depth of a freshly opened chat
    pub initial_history_depth: usize,
    /// Increment applied by the "more" command
    pub history_step: usize,
    /// Number of chats shown by the listing
    pub list_size: usize,
    /// Do-not-disturb state at startup
    pub do_not_disturb: bool,
    /// Whether the main menu offers the do-not-disturb toggle
    pub dnd_toggle: bool,
    /// Whether messages of other chats are announced at all
    pub passive_notifications: bool,
    /// Whether presence is queried when a chat is opened
    pub show_presence: bool,
}

impl InteractionConfig {
    /// Preset for a profile
    pub fn for_profile(profile: Profile) -> Self {
        let basic_exit_words = vec!["<".to_string(), "exit".to_string(), "..".to_string()];

        match profile {
            Profile::Basic => Self {
                profile,
                exit_words: basic_exit_words,
                more_history_token: None,
                initial_history_depth: 10,
                history_step: 20,
                list_size: 20,
                do_not_disturb: false,
                dnd_toggle: false,
                passive_notifications: false,
                show_presence: false,
            },
            Profile::Extended => {
                let mut exit_words = basic_exit_words;
                exit_words.push("back".to_string());
                Self {
                    profile,
                    exit_words,
                    more_history_token: Some("more".to_string()),
                    initial_history_depth: 10,
                    history_step: 20,
                    list_size: 20,
                    do_not_disturb: true,
                    dnd_toggle: true,
                    passive_notifications: true,
                    show_presence: true,
                }
            }
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), ChatError> {
        let exit_words: Vec<String> = self.exit_words.iter().map(|word| normalize(word)).collect();
        if exit_words.iter().all(|word| word.is_empty()) {
            return Err(ChatError::Configuration(
                "At least one exit word must be configured".to_string(),
            ));
        }

        if let Some(token) = &self.more_history_token {
            let token = normalize(token);
            if token.is_empty() {
                return Err(ChatError::Configuration(
                    "More-history token must not be blank".to_string(),
                ));
            }
            if exit_words.contains(&token) {
                return Err(ChatError::Configuration(format!(
                    "'{}' cannot be both an exit word and the more-history token",
                    token
                )));
            }
        }

        if self.initial_history_depth == 0 {
            return Err(ChatError::Configuration(
                "Initial history depth must be greater than 0".to_string(),
            ));
        }

        if self.history_step == 0 {
            return Err(ChatError::Configuration(
                "History step must be greater than 0".to_string(),
            ));
        }

        if self.list_size == 0 {
            return Err(ChatError::Configuration(
                "Chat list size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_presets() {
        let basic = InteractionConfig::for_profile(Profile::Basic);
        assert!(!basic.dnd_toggle);
        assert!(!basic.passive_notifications);
        assert!(basic.more_history_token.is_none());
        assert_eq!(basic.exit_words, vec!["<", "exit", ".."]);

        let extended = InteractionConfig::default();
        assert_eq!(extended.profile, Profile::Extended);
        assert!(extended.dnd_toggle);
        assert!(extended.do_not_disturb);
        assert!(extended.passive_notifications);
        assert!(extended.exit_words.contains(&"back".to_string()));
        assert_eq!(extended.initial_history_depth, 10);
        assert_eq!(extended.history_step, 20);
    }

    #[test]
    fn test_config_validation() {
        assert!(InteractionConfig::default().validate().is_ok());
        assert!(InteractionConfig::for_profile(Profile::Basic).validate().is_ok());

        let mut config = InteractionConfig::default();
        config.exit_words = vec![" ".to_string()];
        assert!(config.validate().is_err());

        let mut config = InteractionConfig::default();
        config.history_step = 0;
        assert!(config.validate().is_err());

        let mut config = InteractionConfig::default();
        config.more_history_token = Some("exit".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_compares_normalized_words() {
        let mut config = InteractionConfig::default();
        config.exit_words = vec!["\u{301}".to_string(), " ".to_string()];
        assert!(config.validate().is_err());

        let mut config = InteractionConfig::default();
        config.more_history_token = Some(" Éxit ".to_string());
        assert!(config.validate().is_err());

        let mut config = InteractionConfig::default();
        config.more_history_token = Some("\u{301}".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("Basic".parse::<Profile>().unwrap(), Profile::Basic);
        assert_eq!("extended".parse::<Profile>().unwrap(), Profile::Extended);
        assert!("fancy".parse::<Profile>().is_err());
        assert_eq!(Profile::Basic.to_string(), "basic");
    }
}
