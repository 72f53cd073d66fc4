//! Simulated transport
//!
//! A stand-in messaging account for running the client without a phone. It pairs
//! through a fake QR challenge, serves a seeded chat list with history and
//! presence, answers sent messages after a delay and produces occasional
//! unsolicited messages (including status broadcasts, which the client hides).

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chatterm_core::format::now_timestamp;
use chatterm_core::{
    Chat, ChatId, ChatResult, ChatTransport, InboundMessage, MediaKind, MemoryTransport, Message,
    Presence, TransportEvent, TransportEventSender,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::TransportSection;

/// Sender of status broadcasts
pub const STATUS_BROADCAST: &str = "status@broadcast";

const CHATTER: &[&str] = &[
    "are you around later?",
    "sent you the file",
    "haha yes",
    "call me when you can",
    "ok",
];

// ----------------------------------------------------------------------------
// Seed Data
// ----------------------------------------------------------------------------

/// One seeded conversation
#[derive(Debug, Clone)]
pub struct SeedChat {
    pub chat: Chat,
    pub history: Vec<Message>,
    pub presence: Option<Presence>,
}

/// Sample account contents relative to `now`
pub fn seed_chats(now: u64) -> Vec<SeedChat> {
    let ago = |minutes: u64| now.saturating_sub(minutes * 60);

    vec![
        SeedChat {
            chat: Chat::new("15550001@c.us", ago(2)).with_name("Alice"),
            history: vec![
                Message::text(false, "hey, are we still on for friday?", ago(10)),
                Message::text(true, "yes! 7pm", ago(8)),
                Message::media(false, MediaKind::Image, ago(3)),
                Message::text(false, "this is the place", ago(2)),
            ],
            presence: Some(Presence::online()),
        },
        SeedChat {
            chat: Chat::new("120363000001@g.us", ago(30)).with_formatted_title("Family"),
            history: vec![
                Message::text(false, "dinner on sunday", ago(90)),
                Message::media(false, MediaKind::Audio, ago(45)),
                Message::text(true, "I'll bring dessert", ago(30)),
            ],
            presence: None,
        },
        SeedChat {
            chat: Chat::new("15550002@c.us", ago(120)).with_name("Bob"),
            history: vec![
                Message::text(true, "did you get the invoice?", ago(180)),
                Message::media(false, MediaKind::Document, ago(120)),
            ],
            presence: Some(Presence::last_seen(ago(60))),
        },
        SeedChat {
            chat: Chat::new("15550003@c.us", ago(600)).with_name("Carol"),
            history: vec![
                Message::media(true, MediaKind::Sticker, ago(620)),
                Message::text(false, "lol", ago(600)),
            ],
            presence: Some(Presence::default()),
        },
        SeedChat {
            chat: Chat::new("15550004@c.us", ago(1440)),
            history: vec![Message::text(false, "Your code is 381-022", ago(1440))],
            presence: None,
        },
    ]
}

/// The unsolicited event of round `round`, cycling through `contacts`
///
/// Every fourth event is a status broadcast and every third a photo.
pub fn ambient_event(round: usize, contacts: &[ChatId], timestamp: u64) -> Option<TransportEvent> {
    let from = contacts.get(round % contacts.len().max(1))?.clone();

    let message = if round % 4 == 3 {
        InboundMessage::text(STATUS_BROADCAST, "new status update", timestamp).as_status()
    } else if round % 3 == 2 {
        InboundMessage::text(from, "", timestamp).with_media(MediaKind::Image)
    } else {
        InboundMessage::text(from, CHATTER[round % CHATTER.len()], timestamp)
    };
    Some(TransportEvent::Message(message))
}

// ----------------------------------------------------------------------------
// Simulated Transport
// ----------------------------------------------------------------------------

/// [`ChatTransport`] simulating a paired phone
pub struct SimulatedTransport {
    memory: MemoryTransport,
    settings: TransportSection,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SimulatedTransport {
    pub fn from_config(settings: &TransportSection) -> Self {
        let memory = MemoryTransport::new().with_auto_ready(false);

        if settings.seed_chats {
            for seed in seed_chats(now_timestamp()) {
                let id = seed.chat.id.clone();
                memory.add_chat(seed.chat);
                for message in seed.history {
                    memory.push_history(&id, message);
                }
                if let Some(presence) = seed.presence {
                    memory.set_presence(&id, presence);
                }
            }
        }

        Self {
            memory,
            settings: settings.clone(),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The backing store, for inspection
    pub fn memory(&self) -> &MemoryTransport {
        &self.memory
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn(&self, task: impl std::future::Future<Output = ()> + Send + 'static) {
        let mut tasks = self.tasks();
        tasks.retain(|handle| !handle.is_finished());
        tasks.push(tokio::spawn(task));
    }

    /// Stop pairing, chatter and pending replies
    pub fn shutdown(&self) {
        for handle in self.tasks().drain(..) {
            handle.abort();
        }
    }
}

impl Drop for SimulatedTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_script(memory: MemoryTransport, settings: TransportSection) {
    let pairing_delay = Duration::from_millis(settings.pairing_delay_ms);

    tokio::time::sleep(pairing_delay).await;
    let code = format!("2@chatterm-simulated,{}", now_timestamp());
    if memory.deliver(TransportEvent::QrChallenge { code }).await.is_err() {
        return;
    }

    tokio::time::sleep(pairing_delay).await;
    info!("Simulated phone paired");
    if memory.deliver(TransportEvent::Ready).await.is_err() {
        return;
    }

    if settings.chatter_interval_ms == 0 {
        return;
    }

    let contacts: Vec<ChatId> = match memory.list_chats().await {
        Ok(chats) => chats.into_iter().map(|chat| chat.id).collect(),
        Err(_) => return,
    };

    let mut ticker = tokio::time::interval(Duration::from_millis(settings.chatter_interval_ms));
    ticker.tick().await;
    for round in 0.. {
        ticker.tick().await;
        let Some(event) = ambient_event(round, &contacts, now_timestamp()) else {
            return;
        };
        if memory.deliver(event).await.is_err() {
            debug!("Event channel closed; stopping chatter");
            return;
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for SimulatedTransport {
    async fn start(&self, events: TransportEventSender) -> ChatResult<()> {
        self.memory.start(events).await?;
        self.spawn(run_script(self.memory.clone(), self.settings.clone()));
        Ok(())
    }

    async fn list_chats(&self) -> ChatResult<Vec<Chat>> {
        self.memory.list_chats().await
    }

    async fn fetch_history(&self, chat: &ChatId, limit: usize) -> ChatResult<Vec<Message>> {
        self.memory.fetch_history(chat, limit).await
    }

    async fn send_message(&self, chat: &ChatId, text: &str) -> ChatResult<()> {
        self.memory.send_message(chat, text).await?;

        if self.settings.reply_delay_ms > 0 {
            let memory = self.memory.clone();
            let delay = Duration::from_millis(self.settings.reply_delay_ms);
            let reply = InboundMessage::text(chat.clone(), format!("got it: {}", text.trim()), 0);
            self.spawn(async move {
                tokio::time::sleep(delay).await;
                let reply = InboundMessage {
                    timestamp: now_timestamp(),
                    ..reply
                };
                if memory.deliver(TransportEvent::Message(reply)).await.is_err() {
                    debug!("Event channel closed; reply dropped");
                }
            });
        }
        Ok(())
    }

    async fn presence(&self, chat: &ChatId) -> ChatResult<Presence> {
        self.memory.presence(chat).await
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
