//! Channel Communication Types
//!
//! The controller consumes two producers through bounded tokio channels:
//! - `TransportEvent`: Transport → Controller (lifecycle signals and live messages)
//! - lines: Terminal → Controller (one operator line per outstanding prompt)

use crate::types::InboundMessage;

// ----------------------------------------------------------------------------
// TransportEvent: Transport → Controller
// ----------------------------------------------------------------------------

/// Events pushed by the transport at any time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The account must be paired by scanning this code
    QrChallenge { code: String },
    /// Authentication completed, the transport accepts calls
    Ready,
    /// A message arrived in some chat
    Message(InboundMessage),
    /// The transport lost its session
    Disconnected { reason: String },
}

// ----------------------------------------------------------------------------
// Channel Types
// ----------------------------------------------------------------------------

pub type TransportEventSender = tokio::sync::mpsc::Sender<TransportEvent>;
pub type TransportEventReceiver = tokio::sync::mpsc::Receiver<TransportEvent>;
pub type LineSender = tokio::sync::mpsc::Sender<String>;
pub type LineReceiver = tokio::sync::mpsc::Receiver<String>;

/// Buffer sizes for the controller's input channels
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Buffer size for transport events (bursty on reconnect)
    pub event_buffer_size: usize,
    /// Buffer size for operator lines (at most one outstanding prompt)
    pub line_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 128,
            line_buffer_size: 4,
        }
    }
}

// ----------------------------------------------------------------------------
// Channel Creation Utilities
// ----------------------------------------------------------------------------

/// Create the transport event channel
pub fn create_event_channel(config: &ChannelConfig) -> (TransportEventSender, TransportEventReceiver) {
    tokio::sync::mpsc::channel(config.event_buffer_size)
}

/// Create the operator line channel
pub fn create_line_channel(config: &ChannelConfig) -> (LineSender, LineReceiver) {
    tokio::sync::mpsc::channel(config.line_buffer_size)
}
