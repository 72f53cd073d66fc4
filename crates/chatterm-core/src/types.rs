//! Core types for the chat-session model
//!
//! Chats, messages and presence snapshots as handed over by the transport. All of
//! them are read-only from the client's point of view.

use core::fmt;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Chat Identifier
// ----------------------------------------------------------------------------

/// Opaque, stable identifier of a conversation (e.g. `15550001111@c.us`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChatId(String);

impl ChatId {
    /// Create a chat identifier from its serialized form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Full serialized identifier, used for routing
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// User part of the identifier (everything before the `@` server suffix)
    pub fn user(&self) -> &str {
        match self.0.split_once('@') {
            Some((user, _)) => user,
            None => &self.0,
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ----------------------------------------------------------------------------
// Chat
// ----------------------------------------------------------------------------

/// Snapshot of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Routing identifier
    pub id: ChatId,
    /// Contact or group name, if the account knows one
    pub name: Option<String>,
    /// Transport-formatted title (usually the formatted phone number)
    pub formatted_title: Option<String>,
    /// Last activity, seconds since the Unix epoch
    pub timestamp: u64,
}

impl Chat {
    pub fn new(id: impl Into<ChatId>, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            name: None,
            formatted_title: None,
            timestamp,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_formatted_title(mut self, title: impl Into<String>) -> Self {
        self.formatted_title = Some(title.into());
        self
    }

    /// Human-readable name: name, then formatted title, then the raw identifier
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.formatted_title.as_deref()]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or_else(|| self.id.user())
    }
}

impl From<String> for ChatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ----------------------------------------------------------------------------
// Media
// ----------------------------------------------------------------------------

/// Kind of media attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Sticker,
    Document,
    #[default]
    Other,
}

impl MediaKind {
    /// Label used in media placeholders
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
            MediaKind::Sticker => "Sticker",
            MediaKind::Document => "Document",
            MediaKind::Other => "Media",
        }
    }
}

// ----------------------------------------------------------------------------
// Messages
// ----------------------------------------------------------------------------

/// A history entry fetched from the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Whether the account itself sent the message
    pub from_self: bool,
    /// Body text, empty for media-only messages
    pub body: String,
    /// Attached media, if any
    pub media: Option<MediaKind>,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl Message {
    pub fn text(from_self: bool, body: impl Into<String>, timestamp: u64) -> Self {
        Self {
            from_self,
            body: body.into(),
            media: None,
            timestamp,
        }
    }

    pub fn media(from_self: bool, kind: MediaKind, timestamp: u64) -> Self {
        Self {
            from_self,
            body: String::new(),
            media: Some(kind),
            timestamp,
        }
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }
}

/// A live message pushed by the transport's event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Originating chat
    pub from: ChatId,
    pub body: String,
    pub media: Option<MediaKind>,
    pub from_self: bool,
    /// Status/story broadcast rather than a chat message
    pub is_status: bool,
    pub timestamp: u64,
}

impl InboundMessage {
    pub fn text(from: impl Into<ChatId>, body: impl Into<String>, timestamp: u64) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            media: None,
            from_self: false,
            is_status: false,
            timestamp,
        }
    }

    pub fn with_media(mut self, kind: MediaKind) -> Self {
        self.media = Some(kind);
        self
    }

    pub fn as_status(mut self) -> Self {
        self.is_status = true;
        self
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    /// History view of this message
    pub fn to_message(&self) -> Message {
        Message {
            from_self: self.from_self,
            body: self.body.clone(),
            media: self.media,
            timestamp: self.timestamp,
        }
    }
}

// ----------------------------------------------------------------------------
// Presence
// ----------------------------------------------------------------------------

/// Presence snapshot of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presence {
    pub is_online: bool,
    /// Seconds since the Unix epoch, when the contact shares it
    pub last_seen: Option<u64>,
}

impl Presence {
    pub fn online() -> Self {
        Self {
            is_online: true,
            last_seen: None,
        }
    }

    pub fn last_seen(timestamp: u64) -> Self {
        Self {
            is_online: false,
            last_seen: Some(timestamp),
        }
    }
}
