//! chatterm Configuration Management
//!
//! Configuration is layered with figment, lowest priority first:
//! - built-in defaults
//! - `chatterm.toml` in the working directory
//! - `~/.chatterm/config.toml`
//! - `CHATTERM_*` environment variables (`__` separates sections, e.g.
//!   `CHATTERM_INTERACTION__PROFILE=basic`)
//! - an explicit `--config` file
//! - command-line flags

use std::path::{Path, PathBuf};

use chatterm_core::{InteractionConfig, Profile};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Name of the only built-in transport adapter
pub const SIMULATED_TRANSPORT: &str = "simulated";

// ----------------------------------------------------------------------------
// Client Configuration
// ----------------------------------------------------------------------------

/// Complete configuration of the terminal client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Menu and chat-loop behavior
    pub interaction: InteractionSection,

    /// Transport adapter selection and knobs
    pub transport: TransportSection,

    /// Terminal presentation and logging
    pub cli: CliSection,
}

/// Profile plus optional per-setting overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionSection {
    pub profile: Profile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_words: Option<Vec<String>>,

    /// An empty string disables the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_history_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_history_depth: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_step: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_disturb: Option<bool>,

    /// Announce messages of other chats while no chat is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_notifications: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_presence: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSection {
    /// Adapter name
    pub kind: String,

    /// Populate the simulated account with sample chats
    pub seed_chats: bool,

    /// Delay before the pairing challenge and again before readiness
    pub pairing_delay_ms: u64,

    /// Delay of the simulated contact's reply; 0 disables replies
    pub reply_delay_ms: u64,

    /// Interval of unsolicited inbound messages; 0 disables them
    pub chatter_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliSection {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Prompt under the main menu
    pub prompt: String,

    /// Whether to use colored output
    pub colored_output: bool,

    /// Write logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

// ----------------------------------------------------------------------------
// Default Implementations
// ----------------------------------------------------------------------------

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            kind: SIMULATED_TRANSPORT.to_string(),
            seed_chats: true,
            pairing_delay_ms: 400,
            reply_delay_ms: 1500,
            chatter_interval_ms: 20_000,
        }
    }
}

impl Default for CliSection {
    fn default() -> Self {
        Self {
            verbose: false,
            prompt: "> ".to_string(),
            colored_output: true,
            log_file: None,
        }
    }
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub profile: Option<Profile>,
    pub verbose: bool,
    pub no_color: bool,
}

impl ClientConfig {
    /// Load a single file on top of the defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::require_file(path)?;

        let config: ClientConfig = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ConfigError::Loading(format!("Failed to load from {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn load_with_overrides(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file("chatterm.toml"));

        if let Some(path) = Self::default_config_path() {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("CHATTERM_").split("__"));

        if let Some(path) = &overrides.config_file {
            Self::require_file(path)?;
            figment = figment.merge(Toml::file(path));
        }
        if let Some(profile) = overrides.profile {
            figment = figment.merge(("interaction.profile", profile));
        }
        if overrides.verbose {
            figment = figment.merge(("cli.verbose", true));
        }
        if overrides.no_color {
            figment = figment.merge(("cli.colored_output", false));
        }

        let config: ClientConfig = figment
            .extract()
            .map_err(|e| ConfigError::Loading(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// `~/.chatterm/config.toml`, when a home directory is known
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".chatterm").join("config.toml"))
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(ConfigError::FileSystem(format!(
                "Configuration file not found: {}",
                path.display()
            )))
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interaction()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.transport.kind != SIMULATED_TRANSPORT {
            return Err(ConfigError::Validation(format!(
                "Unknown transport: {}",
                self.transport.kind
            )));
        }

        if self.cli.prompt.is_empty() {
            return Err(ConfigError::Validation("Prompt must not be empty".to_string()));
        }

        Ok(())
    }

    /// The profile preset with every configured override applied
    pub fn interaction(&self) -> InteractionConfig {
        let section = &self.interaction;
        let mut config = InteractionConfig::for_profile(section.profile);

        if let Some(words) = &section.exit_words {
            config.exit_words = words.clone();
        }
        if let Some(token) = &section.more_history_token {
            config.more_history_token = Some(token.clone()).filter(|token| !token.is_empty());
        }
        if let Some(depth) = section.initial_history_depth {
            config.initial_history_depth = depth;
        }
        if let Some(step) = section.history_step {
            config.history_step = step;
        }
        if let Some(size) = section.list_size {
            config.list_size = size;
        }
        if let Some(dnd) = section.do_not_disturb {
            config.do_not_disturb = dnd;
        }
        if let Some(passive) = section.passive_notifications {
            config.passive_notifications = passive;
        }
        if let Some(presence) = section.show_presence {
            config.show_presence = presence;
        }
        config
    }

    /// Create example configuration file content
    pub fn example_config() -> String {
        let example = ClientConfig {
            interaction: InteractionSection {
                profile: Profile::Extended,
                exit_words: Some(vec![
                    "<".to_string(),
                    "exit".to_string(),
                    "..".to_string(),
                    "back".to_string(),
                ]),
                more_history_token: Some("more".to_string()),
                history_step: Some(20),
                do_not_disturb: Some(true),
                ..Default::default()
            },
            cli: CliSection {
                log_file: Some(PathBuf::from("chatterm.log")),
                ..Default::default()
            },
            ..Default::default()
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Failed to generate example config".to_string())
    }
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
