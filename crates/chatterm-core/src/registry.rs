//! Session Registry
//!
//! Holds the most recently loaded chat list, sorted by last activity. The list is
//! replaced wholesale on every refresh; selection indexes into the full set even
//! though the listing only shows the top entries.

use tracing::debug;

use crate::errors::{ChatError, ChatResult};
use crate::transport::ChatTransport;
use crate::types::{Chat, ChatId};

/// Sender label used when an inbound message does not match a known chat
pub const UNKNOWN_SENDER: &str = "unknown";

#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    chats: Vec<Chat>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all chats and replace the current list
    ///
    /// A transport failure leaves the previous list untouched.
    pub async fn refresh(&mut self, transport: &dyn ChatTransport) -> ChatResult<&[Chat]> {
        let chats = transport.list_chats().await?;
        debug!("Loaded {} chats from {} transport", chats.len(), transport.name());
        self.replace(chats);
        Ok(&self.chats)
    }

    /// Install a new chat list, most recent activity first
    pub fn replace(&mut self, mut chats: Vec<Chat>) {
        chats.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.chats = chats;
    }

    /// Resolve operator input to a chat
    ///
    /// Anything but a plain decimal index inside `[0, len)` is `NotFound`.
    pub fn select(&self, input: &str) -> ChatResult<&Chat> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChatError::not_found(trimmed));
        }

        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|index| self.chats.get(index))
            .ok_or_else(|| ChatError::not_found(trimmed))
    }

    /// Full sorted list
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// The `count` most recent chats
    pub fn top(&self, count: usize) -> &[Chat] {
        &self.chats[..count.min(self.chats.len())]
    }

    pub fn find(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| &chat.id == id)
    }

    /// Display name of a chat, or [`UNKNOWN_SENDER`]
    pub fn sender_name(&self, id: &ChatId) -> &str {
        self.find(id).map(Chat::display_name).unwrap_or(UNKNOWN_SENDER)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryTransport;
    use proptest::prelude::*;

    fn create_test_chats() -> Vec<Chat> {
        vec![
            Chat::new("old@c.us", 10).with_name("Old"),
            Chat::new("new@c.us", 300).with_name("New"),
            Chat::new("mid@c.us", 200).with_name("Mid"),
        ]
    }

    #[test]
    fn test_replace_sorts_descending() {
        let mut registry = SessionRegistry::new();
        registry.replace(create_test_chats());

        let names: Vec<_> = registry.chats().iter().map(Chat::display_name).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn test_select_rejects_bad_input() {
        let mut registry = SessionRegistry::new();
        registry.replace(create_test_chats());

        assert_eq!(registry.select("0").unwrap().display_name(), "New");
        assert_eq!(registry.select(" 2 ").unwrap().display_name(), "Old");
        for input in ["3", "-1", "+1", "one", "", "1.0", "99999999999999999999999"] {
            assert!(
                matches!(registry.select(input), Err(ChatError::NotFound { .. })),
                "input {:?} should not select a chat",
                input
            );
        }
    }

    #[test]
    fn test_top_truncates() {
        let mut registry = SessionRegistry::new();
        registry.replace(create_test_chats());
        assert_eq!(registry.top(2).len(), 2);
        assert_eq!(registry.top(20).len(), 3);
    }

    #[test]
    fn test_sender_name_falls_back_to_unknown() {
        let mut registry = SessionRegistry::new();
        registry.replace(create_test_chats());
        assert_eq!(registry.sender_name(&ChatId::new("mid@c.us")), "Mid");
        assert_eq!(registry.sender_name(&ChatId::new("ghost@c.us")), UNKNOWN_SENDER);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_list() {
        let transport = MemoryTransport::new().with_chat(Chat::new("a@c.us", 1).with_name("Alice"));
        let mut registry = SessionRegistry::new();
        registry.refresh(&transport).await.unwrap();
        assert_eq!(registry.len(), 1);

        transport.add_chat(Chat::new("b@c.us", 2));
        transport.fail_listing(Some("socket closed"));
        let err = registry.refresh(&transport).await.unwrap_err();
        assert!(matches!(err, ChatError::TransportFatal { .. }));
        assert_eq!(registry.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_select_succeeds_iff_in_range(count in 0usize..40, index in 0usize..60) {
            let mut registry = SessionRegistry::new();
            registry.replace((0..count).map(|i| Chat::new(format!("{}@c.us", i), i as u64)).collect());

            let selected = registry.select(&index.to_string());
            prop_assert_eq!(selected.is_ok(), index < count);
        }
    }
}
