//! Session context
//!
//! The explicit state object owned by the controller: the registry, the active
//! session (if any) and the do-not-disturb flag.

use tracing::debug;

use crate::errors::{ChatError, ChatResult};
use crate::registry::SessionRegistry;
use crate::types::{Chat, ChatId};

/// The chat currently being conversed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// Chat in the registry this session refers to
    pub chat_id: ChatId,
    /// Number of history entries rendered; only grows
    pub history_depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    registry: SessionRegistry,
    active: Option<ActiveSession>,
    do_not_disturb: bool,
}

impl SessionContext {
    pub fn new(do_not_disturb: bool) -> Self {
        Self {
            registry: SessionRegistry::new(),
            active: None,
            do_not_disturb,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut self.registry
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// The chat behind the active session
    pub fn active_chat(&self) -> Option<&Chat> {
        self.active
            .as_ref()
            .and_then(|session| self.registry.find(&session.chat_id))
    }

    pub fn active_chat_id(&self) -> Option<&ChatId> {
        self.active.as_ref().map(|session| &session.chat_id)
    }

    /// Open a session on the chat at `input`
    ///
    /// On `NotFound` the current session is left as it was.
    pub fn select(&mut self, input: &str, history_depth: usize) -> ChatResult<&Chat> {
        let chat_id = self.registry.select(input)?.id.clone();
        debug!("Opening session on {}", chat_id);
        self.active = Some(ActiveSession {
            chat_id,
            history_depth,
        });
        self.active_chat()
            .ok_or_else(|| ChatError::not_found(input))
    }

    /// Close the active session, returning it
    pub fn deactivate(&mut self) -> Option<ActiveSession> {
        self.active.take()
    }

    /// Grow the history depth of the active session, returning the new depth
    pub fn grow_history(&mut self, step: usize) -> Option<usize> {
        self.active.as_mut().map(|session| {
            session.history_depth = session.history_depth.saturating_add(step);
            session.history_depth
        })
    }

    pub fn do_not_disturb(&self) -> bool {
        self.do_not_disturb
    }

    /// Flip do-not-disturb, returning the new value
    pub fn toggle_do_not_disturb(&mut self) -> bool {
        self.do_not_disturb = !self.do_not_disturb;
        self.do_not_disturb
    }
}
