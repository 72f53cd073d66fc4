//! Display Formatter
//!
//! Pure rendering of chats, history entries, media placeholders and presence.

use chrono::{DateTime, Local, Utc};

use crate::errors::ChatResult;
use crate::types::{Chat, MediaKind, Message, Presence};

/// Sender label for messages written by the account itself
pub const SELF_LABEL: &str = "self";

/// `"{index}: {display name}"`
pub fn summary_line(chat: &Chat, index: usize) -> String {
    format!("{}: {}", index, chat.display_name())
}

/// `"[{sender} - {timestamp}]: {content}"`
pub fn history_line(message: &Message, chat: &Chat) -> String {
    let sender = if message.from_self {
        SELF_LABEL
    } else {
        chat.display_name()
    };
    format!(
        "[{} - {}]: {}",
        sender,
        format_timestamp(message.timestamp),
        message_content(&message.body, message.media, message.from_self)
    )
}

/// `"[Image sent]"`, `"[Media received]"`, ...
pub fn media_placeholder(kind: MediaKind, from_self: bool) -> String {
    let direction = if from_self { "sent" } else { "received" };
    format!("[{} {}]", kind.label(), direction)
}

/// Body text, or the media placeholder when media is attached
pub fn message_content(body: &str, media: Option<MediaKind>, from_self: bool) -> String {
    match media {
        Some(kind) => media_placeholder(kind, from_self),
        None => body.to_string(),
    }
}

/// Status line for a presence query, including a failed one
pub fn presence_line(presence: &ChatResult<Presence>) -> String {
    match presence {
        Ok(Presence { is_online: true, .. }) => "online".to_string(),
        Ok(Presence {
            last_seen: Some(timestamp),
            ..
        }) => format!("last seen {}", format_timestamp(*timestamp)),
        Ok(_) => "unknown".to_string(),
        Err(_) => "status unavailable".to_string(),
    }
}

/// Current Unix time in seconds
pub fn now_timestamp() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Local date and local time of a Unix timestamp in seconds
pub fn format_timestamp(timestamp: u64) -> String {
    let seconds = i64::try_from(timestamp).unwrap_or(i64::MAX);
    match DateTime::from_timestamp(seconds, 0) {
        Some(utc) => {
            let local = utc.with_timezone(&Local);
            local.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        None => timestamp.to_string(),
    }
}
