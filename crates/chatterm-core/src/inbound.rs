//! Inbound-event routing
//!
//! Decides how a live message is displayed relative to the active session.

use crate::types::{ChatId, InboundMessage};

/// Display decision for one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Message of the active chat, shown inline
    Live,
    /// Notification about another chat
    Passive,
    /// Hidden by do-not-disturb
    Suppressed,
    /// Status broadcast, never shown
    Ignored,
}

/// Route a message given the active chat and the do-not-disturb flag
///
/// Do-not-disturb hides other chats only while a chat is open; the active chat
/// is always shown.
pub fn route(message: &InboundMessage, active: Option<&ChatId>, do_not_disturb: bool) -> Route {
    if message.is_status {
        return Route::Ignored;
    }
    match active {
        Some(chat) if *chat == message.from => Route::Live,
        Some(_) if do_not_disturb => Route::Suppressed,
        _ => Route::Passive,
    }
}
