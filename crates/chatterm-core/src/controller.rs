//! Interaction Controller
//!
//! The single dispatcher that owns all session state. Operator lines and transport
//! events arrive on two channels and are applied one at a time, so no state is
//! ever shared between the prompt and the event stream.
//!
//! Inbound messages that arrive before the transport is ready are queued and
//! displayed once the main menu is reached.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::channel::{LineReceiver, TransportEvent, TransportEventReceiver};
use crate::commands::{ChatCommand, CommandSet};
use crate::config::InteractionConfig;
use crate::console::{Console, Tone};
use crate::errors::{ChatError, ChatResult};
use crate::format::{history_line, message_content, presence_line, summary_line};
use crate::inbound::{route, Route};
use crate::menu::{menu_lines, MenuChoice, MenuState};
use crate::session::SessionContext;
use crate::transport::ChatTransport;
use crate::types::InboundMessage;

/// Prompt shown under the main menu
pub const MENU_PROMPT: &str = "> ";
/// Prompt asking for a chat index
pub const INDEX_PROMPT: &str = "Enter the chat number: ";

pub struct Controller<C: Console> {
    transport: Arc<dyn ChatTransport>,
    config: InteractionConfig,
    commands: CommandSet,
    context: SessionContext,
    state: MenuState,
    console: C,
    /// Messages received while still connecting
    pending: VecDeque<InboundMessage>,
    menu_prompt: String,
}

impl<C: Console> Controller<C> {
    pub fn new(transport: Arc<dyn ChatTransport>, config: InteractionConfig, console: C) -> Self {
        Self {
            commands: CommandSet::from_config(&config),
            context: SessionContext::new(config.do_not_disturb),
            transport,
            config,
            state: MenuState::Connecting,
            console,
            pending: VecDeque::new(),
            menu_prompt: MENU_PROMPT.to_string(),
        }
    }

    /// Override the prompt shown under the main menu
    pub fn with_menu_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.menu_prompt = prompt.into();
        self
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Run until the operator exits or a fatal error occurs
    pub async fn run(
        &mut self,
        mut lines: LineReceiver,
        mut events: TransportEventReceiver,
    ) -> ChatResult<()> {
        info!("Controller starting on {} transport", self.transport.name());

        while self.state != MenuState::Exiting {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => self.handle_line(line).await?,
                    None => {
                        info!("Operator input closed, exiting");
                        self.state = MenuState::Exiting;
                    }
                },
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await?,
                    None => {
                        return Err(ChatError::transport("event stream", "transport event channel closed"));
                    }
                },
            }
        }

        info!("Controller stopped");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transport Events
    // ------------------------------------------------------------------------

    /// Apply one transport event
    pub async fn handle_event(&mut self, event: TransportEvent) -> ChatResult<()> {
        match event {
            TransportEvent::QrChallenge { code } => {
                info!("Pairing required");
                self.console.print(Tone::Notice, "Scan this QR code with your phone:");
                self.console.show_qr(&code);
            }
            TransportEvent::Ready => {
                if self.state != MenuState::Connecting {
                    debug!("Ignoring repeated ready signal");
                    return Ok(());
                }
                info!("Transport {} is ready", self.transport.name());
                self.console.print(Tone::Success, "Client is ready!");
                self.list_chats().await?;
                self.state = MenuState::MainMenu;
                while let Some(message) = self.pending.pop_front() {
                    self.display_inbound(message);
                }
                self.show_menu();
            }
            TransportEvent::Message(message) => {
                if self.state == MenuState::Connecting {
                    debug!("Queueing message from {} until ready", message.from);
                    self.pending.push_back(message);
                } else {
                    self.display_inbound(message);
                }
            }
            TransportEvent::Disconnected { reason } => {
                warn!("Transport disconnected: {}", reason);
                return Err(ChatError::transport("session", reason));
            }
        }
        Ok(())
    }

    fn display_inbound(&mut self, message: InboundMessage) {
        let decision = route(
            &message,
            self.context.active_chat_id(),
            self.context.do_not_disturb(),
        );
        let content = message_content(&message.body, message.media, message.from_self);
        let sender = self.context.registry().sender_name(&message.from).to_string();

        match decision {
            Route::Live => {
                self.console.print(Tone::Notice, &format!("[{}]: {}", sender, content));
            }
            Route::Passive if !self.config.passive_notifications => {
                debug!("Passive notifications off: hiding message from {}", message.from);
            }
            Route::Passive if message.has_media() => {
                self.console
                    .print(Tone::Notice, &format!("Media message from {}: {}", sender, content));
            }
            Route::Passive => {
                self.console
                    .print(Tone::Notice, &format!("Message from {}: {}", sender, content));
            }
            Route::Suppressed => {
                debug!("Do not disturb: hiding message from {}", message.from);
            }
            Route::Ignored => {
                debug!("Ignoring status update from {}", message.from);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Operator Lines
    // ------------------------------------------------------------------------

    /// Apply one operator line to the current state
    pub async fn handle_line(&mut self, line: String) -> ChatResult<()> {
        match self.state {
            MenuState::Connecting | MenuState::Exiting => {
                debug!("Ignoring input in state {:?}", self.state);
                Ok(())
            }
            MenuState::MainMenu => self.menu_input(&line).await,
            MenuState::AwaitingChatIndex => self.enter_chat(&line).await,
            MenuState::InChat => self.chat_input(line).await,
        }
    }

    async fn menu_input(&mut self, line: &str) -> ChatResult<()> {
        match MenuChoice::parse(line, self.config.dnd_toggle) {
            MenuChoice::ListChats => {
                self.list_chats().await?;
                self.show_menu();
            }
            MenuChoice::SelectChat => {
                self.state = MenuState::AwaitingChatIndex;
                self.console.prompt(INDEX_PROMPT);
            }
            MenuChoice::ToggleDoNotDisturb => {
                let enabled = self.context.toggle_do_not_disturb();
                info!("Do not disturb set to {}", enabled);
                let state = if enabled { "enabled" } else { "disabled" };
                self.console.print(Tone::Plain, &format!("Do not disturb {}", state));
                self.show_menu();
            }
            MenuChoice::Exit => {
                self.console.print(Tone::Plain, "Exiting...");
                self.state = MenuState::Exiting;
            }
            MenuChoice::Invalid => {
                self.console.print(Tone::Error, "Invalid option. Try again.");
                self.show_menu();
            }
        }
        Ok(())
    }

    fn show_menu(&mut self) {
        for line in menu_lines(&self.config, self.context.do_not_disturb()) {
            self.console.print(Tone::Menu, &line);
        }
        self.console.prompt(&self.menu_prompt);
    }

    async fn list_chats(&mut self) -> ChatResult<()> {
        self.context
            .registry_mut()
            .refresh(self.transport.as_ref())
            .await?;

        let registry = self.context.registry();
        if registry.is_empty() {
            self.console.print(Tone::Plain, "No chats available.");
            return Ok(());
        }

        let shown = registry.top(self.config.list_size);
        self.console.print(Tone::Plain, &format!("Last {} chats:", shown.len()));
        for (index, chat) in shown.iter().enumerate() {
            self.console.print(Tone::Plain, &summary_line(chat, index));
        }
        Ok(())
    }

    async fn enter_chat(&mut self, input: &str) -> ChatResult<()> {
        let chat = match self.context.select(input, self.config.initial_history_depth) {
            Ok(chat) => chat.clone(),
            Err(ChatError::NotFound { input }) => {
                debug!("No chat at index {:?}", input);
                self.console.print(Tone::Error, "Invalid chat index.");
                self.state = MenuState::MainMenu;
                self.show_menu();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.console
            .print(Tone::Success, &format!("Selected chat: {}", chat.display_name()));

        if self.config.show_presence {
            let presence = self.transport.presence(&chat.id).await;
            if let Err(e) = &presence {
                warn!("Presence query failed: {}", e);
            }
            self.console
                .print(Tone::Plain, &format!("Contact status: {}", presence_line(&presence)));
        }

        self.show_history().await?;
        self.state = MenuState::InChat;
        self.prompt_chat();
        Ok(())
    }

    async fn show_history(&mut self) -> ChatResult<()> {
        let (chat, depth) = match (self.context.active_chat(), self.context.active()) {
            (Some(chat), Some(session)) => (chat.clone(), session.history_depth),
            _ => return Ok(()),
        };

        let messages = self.transport.fetch_history(&chat.id, depth).await?;
        self.console.print(Tone::Plain, "--- Chat history ---");
        for message in messages.iter().rev() {
            self.console.print(Tone::Plain, &history_line(message, &chat));
        }
        self.console.print(Tone::Plain, "--- End of history ---");
        Ok(())
    }

    fn prompt_chat(&mut self) {
        let exits = self
            .commands
            .exit_words()
            .iter()
            .map(|word| format!("\"{}\"", word))
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = match &self.config.more_history_token {
            Some(token) => format!(
                "Message (or {} to go back, \"{}\" for older messages): ",
                exits, token
            ),
            None => format!("Message (or {} to go back): ", exits),
        };
        self.console.prompt(&prompt);
    }

    async fn chat_input(&mut self, line: String) -> ChatResult<()> {
        match self.commands.interpret(&line) {
            ChatCommand::Exit => self.leave_chat(),
            ChatCommand::MoreHistory => {
                if let Some(depth) = self.context.grow_history(self.config.history_step) {
                    debug!("History depth raised to {}", depth);
                }
                self.show_history().await?;
                self.prompt_chat();
            }
            ChatCommand::Empty => self.prompt_chat(),
            ChatCommand::Send(text) => {
                self.send(&text).await;
                self.prompt_chat();
            }
        }
        Ok(())
    }

    async fn send(&mut self, text: &str) {
        let Some(chat) = self.context.active_chat().cloned() else {
            warn!("Send requested without an active chat");
            return;
        };

        match self.transport.send_message(&chat.id, text).await {
            Ok(()) => {
                self.console.print(
                    Tone::Success,
                    &format!("Message sent to {}: {}", chat.display_name(), text),
                );
            }
            Err(e) => {
                warn!("Send to {} failed: {}", chat.id, e);
                self.console.print(Tone::Error, &format!("Error sending message: {}", e));
            }
        }
    }

    fn leave_chat(&mut self) {
        if let Some(session) = self.context.deactivate() {
            debug!("Closed session on {}", session.chat_id);
        }
        self.console.print(Tone::Plain, "Returning to main menu...");
        self.state = MenuState::MainMenu;
        self.show_menu();
    }
}
