//! In-memory transport
//!
//! A scripted [`ChatTransport`] backed by plain collections. Tests use it to drive
//! the controller deterministically; the simulated adapter in the CLI builds on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::channel::{TransportEvent, TransportEventSender};
use crate::errors::{ChatError, ChatResult};
use crate::format::now_timestamp;
use crate::transport::ChatTransport;
use crate::types::{Chat, ChatId, Message, Presence};

#[derive(Debug, Default)]
struct MemoryState {
    chats: Vec<Chat>,
    history: HashMap<ChatId, Vec<Message>>,
    presence: HashMap<ChatId, Presence>,
    sent: Vec<(ChatId, String)>,
    history_requests: Vec<(ChatId, usize)>,
    listing_failure: Option<String>,
    send_failure: Option<String>,
    qr_code: Option<String>,
    auto_ready: bool,
    events: Option<TransportEventSender>,
}

/// Shared-state transport for tests and simulations
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// Create an empty transport that reports `Ready` as soon as it is started
    pub fn new() -> Self {
        let state = MemoryState {
            auto_ready: true,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_chat(self, chat: Chat) -> Self {
        self.add_chat(chat);
        self
    }

    /// Emit a QR challenge before `Ready` when started
    pub fn with_qr_challenge(self, code: impl Into<String>) -> Self {
        self.state().qr_code = Some(code.into());
        self
    }

    /// Whether `start` emits `Ready` on its own
    pub fn with_auto_ready(self, auto_ready: bool) -> Self {
        self.state().auto_ready = auto_ready;
        self
    }

    /// Add or replace a chat
    pub fn add_chat(&self, chat: Chat) {
        let mut state = self.state();
        state.chats.retain(|existing| existing.id != chat.id);
        state.chats.push(chat);
    }

    /// Append a message to a chat's history
    pub fn push_history(&self, chat: &ChatId, message: Message) {
        let mut state = self.state();
        let timestamp = message.timestamp;
        state.history.entry(chat.clone()).or_default().push(message);
        touch_chat(&mut state.chats, chat, timestamp);
    }

    pub fn set_presence(&self, chat: &ChatId, presence: Presence) {
        self.state().presence.insert(chat.clone(), presence);
    }

    /// Make `list_chats` fail with the given reason, or succeed again with `None`
    pub fn fail_listing(&self, reason: Option<&str>) {
        self.state().listing_failure = reason.map(str::to_string);
    }

    /// Make `send_message` fail with the given reason, or succeed again with `None`
    pub fn fail_sends(&self, reason: Option<&str>) {
        self.state().send_failure = reason.map(str::to_string);
    }

    /// Messages accepted by `send_message`, in order
    pub fn sent_messages(&self) -> Vec<(ChatId, String)> {
        self.state().sent.clone()
    }

    /// `(chat, limit)` pairs requested through `fetch_history`
    pub fn history_requests(&self) -> Vec<(ChatId, usize)> {
        self.state().history_requests.clone()
    }

    /// Push an event to the attached controller
    ///
    /// Live messages are also recorded in the originating chat's history.
    pub async fn deliver(&self, event: TransportEvent) -> ChatResult<()> {
        let sender = {
            let mut state = self.state();
            if let TransportEvent::Message(message) = &event {
                if !message.is_status {
                    let chat = message.from.clone();
                    state.history.entry(chat.clone()).or_default().push(message.to_message());
                    touch_chat(&mut state.chats, &chat, message.timestamp);
                }
            }
            state.events.clone()
        };

        let sender = sender.ok_or_else(|| ChatError::Channel("Transport has not been started".to_string()))?;
        sender
            .send(event)
            .await
            .map_err(|_| ChatError::Channel("Event channel closed".to_string()))
    }
}

fn touch_chat(chats: &mut [Chat], id: &ChatId, timestamp: u64) {
    if let Some(chat) = chats.iter_mut().find(|chat| &chat.id == id) {
        chat.timestamp = chat.timestamp.max(timestamp);
    }
}

#[async_trait::async_trait]
impl ChatTransport for MemoryTransport {
    async fn start(&self, events: TransportEventSender) -> ChatResult<()> {
        let (qr_code, auto_ready) = {
            let mut state = self.state();
            state.events = Some(events);
            (state.qr_code.clone(), state.auto_ready)
        };

        if let Some(code) = qr_code {
            self.deliver(TransportEvent::QrChallenge { code }).await?;
        }
        if auto_ready {
            self.deliver(TransportEvent::Ready).await?;
        }
        Ok(())
    }

    async fn list_chats(&self) -> ChatResult<Vec<Chat>> {
        let state = self.state();
        match &state.listing_failure {
            Some(reason) => Err(ChatError::transport("list chats", reason.clone())),
            None => Ok(state.chats.clone()),
        }
    }

    async fn fetch_history(&self, chat: &ChatId, limit: usize) -> ChatResult<Vec<Message>> {
        let mut state = self.state();
        state.history_requests.push((chat.clone(), limit));

        let history = state.history.get(chat).map(Vec::as_slice).unwrap_or_default();
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }

    async fn send_message(&self, chat: &ChatId, text: &str) -> ChatResult<()> {
        let mut state = self.state();
        if let Some(reason) = &state.send_failure {
            return Err(ChatError::send_failure(chat, reason.clone()));
        }

        debug!("Memory transport accepted message for {}", chat);
        state.sent.push((chat.clone(), text.to_string()));
        let timestamp = now_timestamp();
        state
            .history
            .entry(chat.clone())
            .or_default()
            .push(Message::text(true, text, timestamp));
        touch_chat(&mut state.chats, chat, timestamp);
        Ok(())
    }

    async fn presence(&self, chat: &ChatId) -> ChatResult<Presence> {
        self.state()
            .presence
            .get(chat)
            .copied()
            .ok_or_else(|| ChatError::presence_unavailable(chat, "contact does not share presence"))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
