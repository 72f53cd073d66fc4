//! Error types for the chat-session model
//!
//! Recoverable conditions (`NotFound`, `SendFailure`, `PresenceUnavailable`) are
//! handled locally by the controller; `TransportFatal`, `Channel` and
//! `Configuration` propagate to the caller.

use crate::types::ChatId;

/// Errors produced by the interaction model and its transport
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("No chat at index '{input}'")]
    NotFound { input: String },

    #[error("Failed to send message to {chat}: {reason}")]
    SendFailure { chat: ChatId, reason: String },

    #[error("Presence unavailable for {chat}: {reason}")]
    PresenceUnavailable { chat: ChatId, reason: String },

    #[error("Transport failure during {operation}: {reason}")]
    TransportFatal { operation: String, reason: String },

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ChatError {
    pub fn not_found(input: impl Into<String>) -> Self {
        ChatError::NotFound {
            input: input.into(),
        }
    }

    pub fn send_failure(chat: &ChatId, reason: impl Into<String>) -> Self {
        ChatError::SendFailure {
            chat: chat.clone(),
            reason: reason.into(),
        }
    }

    pub fn presence_unavailable(chat: &ChatId, reason: impl Into<String>) -> Self {
        ChatError::PresenceUnavailable {
            chat: chat.clone(),
            reason: reason.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        ChatError::TransportFatal {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for chat operations
pub type ChatResult<T> = core::result::Result<T, ChatError>;
