//! Transport Adapter Trait Definition
//!
//! The messaging transport (session authentication, pairing, delivery, presence) is
//! an external collaborator. The controller only talks to it through
//! [`ChatTransport`]; concrete adapters live with the binary that wires them up.

pub mod memory;

use crate::channel::TransportEventSender;
use crate::errors::ChatResult;
use crate::types::{Chat, ChatId, Message, Presence};

// ----------------------------------------------------------------------------
// Transport Trait
// ----------------------------------------------------------------------------

/// Common interface for messaging transports
///
/// Every call runs to completion or failure; there is no deadline. Inbound
/// traffic and lifecycle signals are pushed through the event sender handed to
/// [`ChatTransport::start`].
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Attach the event channel and begin authentication
    ///
    /// Implementations emit `QrChallenge` when pairing is needed and `Ready` once
    /// the other calls may be used.
    async fn start(&self, events: TransportEventSender) -> ChatResult<()>;

    /// All chats known to the account, in transport order
    async fn list_chats(&self) -> ChatResult<Vec<Chat>>;

    /// The most recent `limit` messages of a chat, oldest first
    async fn fetch_history(&self, chat: &ChatId, limit: usize) -> ChatResult<Vec<Message>>;

    /// Send a text message
    async fn send_message(&self, chat: &ChatId, text: &str) -> ChatResult<()>;

    /// Presence of the chat's contact
    async fn presence(&self, chat: &ChatId) -> ChatResult<Presence>;

    /// Short adapter name for logs
    fn name(&self) -> &'static str;
}
