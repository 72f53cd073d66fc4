//! Menu state machine types
//!
//! `Connecting` precedes the menu until the transport reports readiness; the rest
//! mirrors the operator-visible screens.

use crate::config::InteractionConfig;

/// Where the operator currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Waiting for the transport's `Ready` signal
    Connecting,
    MainMenu,
    AwaitingChatIndex,
    InChat,
    Exiting,
}

/// Main-menu entry picked by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListChats,
    SelectChat,
    ToggleDoNotDisturb,
    Exit,
    Invalid,
}

impl MenuChoice {
    /// Parse a main-menu line; the numbering shifts when the toggle is offered
    pub fn parse(input: &str, dnd_toggle: bool) -> Self {
        match (input.trim(), dnd_toggle) {
            ("1", _) => MenuChoice::ListChats,
            ("2", _) => MenuChoice::SelectChat,
            ("3", true) => MenuChoice::ToggleDoNotDisturb,
            ("3", false) | ("4", true) => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

/// Lines of the main menu
pub fn menu_lines(config: &InteractionConfig, do_not_disturb: bool) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Choose an option:".to_string(),
        format!("1. List the last {} chats", config.list_size),
        "2. Select a chat".to_string(),
    ];

    if config.dnd_toggle {
        let state = if do_not_disturb { "on" } else { "off" };
        lines.push(format!("3. Do not disturb ({})", state));
        lines.push("4. Exit".to_string());
    } else {
        lines.push("3. Exit".to_string());
    }
    lines
}
