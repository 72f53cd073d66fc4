//! End-to-end interaction tests
//!
//! These tests drive the controller's dispatcher loop through its two input
//! channels, the way the terminal client does, with a scripted transport on the
//! other side.

use std::sync::Arc;
use std::time::Duration;

use chatterm_core::controller::{INDEX_PROMPT, MENU_PROMPT};
use chatterm_core::*;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

// ----------------------------------------------------------------------------
// Test Utilities
// ----------------------------------------------------------------------------

type RunHandle = JoinHandle<(Controller<RecordingConsole>, ChatResult<()>)>;

struct Harness {
    transport: MemoryTransport,
    console: RecordingConsole,
    lines: LineSender,
    handle: RunHandle,
}

impl Harness {
    async fn start(transport: MemoryTransport, profile: Profile) -> Self {
        let config = ChannelConfig::default();
        let (event_tx, event_rx) = create_event_channel(&config);
        let (line_tx, line_rx) = create_line_channel(&config);
        let console = RecordingConsole::new();

        let mut controller = Controller::new(
            Arc::new(transport.clone()),
            InteractionConfig::for_profile(profile),
            console.clone(),
        );
        transport.start(event_tx).await.unwrap();

        let handle = tokio::spawn(async move {
            let result = controller.run(line_rx, event_rx).await;
            (controller, result)
        });

        let harness = Self {
            transport,
            console,
            lines: line_tx,
            handle,
        };
        harness.wait_for_prompts(1).await;
        harness
    }

    /// Wait until the controller has asked for `count` lines in total
    async fn wait_for_prompts(&self, count: usize) {
        let console = self.console.clone();
        timeout(Duration::from_secs(2), async move {
            while console.prompts().len() < count {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("controller did not prompt in time");
    }

    async fn wait_for_line(&self, needle: &str) {
        let console = self.console.clone();
        let needle = needle.to_string();
        timeout(Duration::from_secs(2), async move {
            while !console.contains(&needle) {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("expected output did not appear in time");
    }

    /// Submit a line and wait for the prompt that follows it
    async fn submit(&self, line: &str) {
        let expected = self.console.prompts().len() + 1;
        self.lines.send(line.to_string()).await.unwrap();
        self.wait_for_prompts(expected).await;
    }

    async fn finish(self) -> (Controller<RecordingConsole>, ChatResult<()>) {
        drop(self.lines);
        timeout(Duration::from_secs(2), self.handle)
            .await
            .expect("controller did not stop in time")
            .unwrap()
    }
}

fn create_two_chat_transport() -> MemoryTransport {
    MemoryTransport::new()
        .with_chat(Chat::new("a", 100).with_name("Alice"))
        .with_chat(Chat::new("b", 50).with_name("Bob"))
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_select_send_and_exit_scenario() {
    let transport = MemoryTransport::new().with_chat(Chat::new("a", 100).with_name("Alice"));
    let harness = Harness::start(transport, Profile::Basic).await;
    assert!(harness.console.contains("0: Alice"));

    harness.submit("2").await;
    assert_eq!(harness.console.prompts().last().unwrap(), INDEX_PROMPT);

    harness.submit("0").await;
    assert!(harness.console.contains("Selected chat: Alice"));

    harness.submit("hello").await;
    assert_eq!(
        harness.transport.sent_messages(),
        vec![(ChatId::new("a"), "hello".to_string())]
    );

    harness.submit("exit").await;
    assert_eq!(harness.console.prompts().last().unwrap(), MENU_PROMPT);
    assert!(harness.console.contains("Returning to main menu..."));

    let transport = harness.transport.clone();
    let (controller, result) = harness.finish().await;
    assert!(result.is_ok());
    assert!(controller.context().active().is_none());
    assert_eq!(transport.sent_messages().len(), 1);
}

#[tokio::test]
async fn test_dnd_hides_other_chats_but_not_the_active_one() {
    let harness = Harness::start(create_two_chat_transport(), Profile::Extended).await;
    harness.submit("2").await;
    harness.submit("0").await;

    harness
        .transport
        .deliver(TransportEvent::Message(InboundMessage::text("b", "from bob", 200)))
        .await
        .unwrap();
    harness
        .transport
        .deliver(TransportEvent::Message(InboundMessage::text("a", "from alice", 201)))
        .await
        .unwrap();

    harness.wait_for_line("[Alice]: from alice").await;
    assert!(!harness.console.contains("from bob"));

    let (_controller, result) = harness.finish().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_menu_shows_notifications_while_dnd_is_on() {
    let harness = Harness::start(create_two_chat_transport(), Profile::Extended).await;
    assert!(harness.console.contains("3. Do not disturb (on)"));

    harness
        .transport
        .deliver(TransportEvent::Message(InboundMessage::text("b", "hi from bob", 200)))
        .await
        .unwrap();
    harness.wait_for_line("Message from Bob: hi from bob").await;

    let (_controller, result) = harness.finish().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_passive_notification_after_dnd_toggle() {
    let harness = Harness::start(create_two_chat_transport(), Profile::Extended).await;
    harness.submit("3").await;
    assert!(harness.console.contains("Do not disturb disabled"));

    harness
        .transport
        .deliver(TransportEvent::Message(
            InboundMessage::text("b", "", 300).with_media(MediaKind::Sticker),
        ))
        .await
        .unwrap();
    harness.wait_for_line("Media message from Bob: [Sticker received]").await;

    let (controller, result) = harness.finish().await;
    assert!(result.is_ok());
    assert_eq!(controller.state(), MenuState::Exiting);
}

#[tokio::test]
async fn test_history_grows_in_steps() {
    let transport = create_two_chat_transport();
    for ts in 0..60 {
        transport.push_history(&ChatId::new("a"), Message::text(ts % 2 == 0, format!("m{}", ts), ts));
    }
    let harness = Harness::start(transport, Profile::Extended).await;
    harness.submit("2").await;
    harness.submit("0").await;
    harness.submit("more").await;
    harness.submit("more").await;

    let limits: Vec<usize> = harness
        .transport
        .history_requests()
        .into_iter()
        .map(|(_, limit)| limit)
        .collect();
    assert_eq!(limits, vec![10, 30, 50]);
    assert!(harness.console.contains("]: m10"));
    assert!(harness.console.contains("[self - "));

    harness.finish().await;
}

#[tokio::test]
async fn test_explicit_exit_stops_the_loop() {
    let harness = Harness::start(create_two_chat_transport(), Profile::Extended).await;
    harness.lines.send("4".to_string()).await.unwrap();

    let (controller, result) = timeout(Duration::from_secs(2), harness.handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(controller.state(), MenuState::Exiting);
    assert!(harness.console.contains("Exiting..."));
}

#[tokio::test]
async fn test_disconnect_terminates_with_error() {
    let harness = Harness::start(create_two_chat_transport(), Profile::Basic).await;
    harness
        .transport
        .deliver(TransportEvent::Disconnected {
            reason: "logged out".to_string(),
        })
        .await
        .unwrap();

    let (_controller, result) = timeout(Duration::from_secs(2), harness.handle)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(ChatError::TransportFatal { .. })));
}

#[tokio::test]
async fn test_closed_event_stream_is_fatal() {
    let config = ChannelConfig::default();
    let (event_tx, event_rx) = create_event_channel(&config);
    let (_line_tx, line_rx) = create_line_channel(&config);
    drop(event_tx);

    let mut controller = Controller::new(
        Arc::new(MemoryTransport::new()),
        InteractionConfig::default(),
        RecordingConsole::new(),
    );
    let result = timeout(Duration::from_secs(2), controller.run(line_rx, event_rx))
        .await
        .unwrap();
    assert!(matches!(result, Err(ChatError::TransportFatal { .. })));
}

#[tokio::test]
async fn test_listing_failure_on_ready_is_fatal() {
    let transport = create_two_chat_transport();
    transport.fail_listing(Some("session expired"));

    let config = ChannelConfig::default();
    let (event_tx, event_rx) = create_event_channel(&config);
    let (_line_tx, line_rx) = create_line_channel(&config);
    transport.start(event_tx).await.unwrap();

    let mut controller = Controller::new(
        Arc::new(transport),
        InteractionConfig::default(),
        RecordingConsole::new(),
    );
    let result = timeout(Duration::from_secs(2), controller.run(line_rx, event_rx))
        .await
        .unwrap();
    assert!(matches!(result, Err(ChatError::TransportFatal { .. })));
    assert_eq!(controller.state(), MenuState::Connecting);
}
