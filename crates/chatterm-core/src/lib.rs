//! chatterm Core
//!
//! The chat-session interaction model behind the `chatterm` terminal client: the
//! session registry, display formatting, the menu state machine, chat-loop command
//! interpretation and inbound-event routing. The messaging transport itself is an
//! external collaborator modelled by the [`ChatTransport`] trait.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod channel;
pub mod commands;
pub mod config;
pub mod console;
pub mod controller;
pub mod errors;
pub mod format;
pub mod inbound;
pub mod menu;
pub mod registry;
pub mod session;
pub mod transport;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{
    create_event_channel, create_line_channel, ChannelConfig, LineReceiver, LineSender,
    TransportEvent, TransportEventReceiver, TransportEventSender,
};
pub use commands::{ChatCommand, CommandSet};
pub use config::{InteractionConfig, Profile};
pub use console::{Console, RecordingConsole, Tone};
pub use controller::Controller;
pub use errors::{ChatError, ChatResult};
pub use inbound::Route;
pub use menu::{MenuChoice, MenuState};
pub use registry::SessionRegistry;
pub use session::{ActiveSession, SessionContext};
pub use transport::{memory::MemoryTransport, ChatTransport};
pub use types::{Chat, ChatId, InboundMessage, MediaKind, Message, Presence};
