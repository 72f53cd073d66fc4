//! Application orchestrator
//!
//! Wires the configured transport, the operator console and the interaction
//! controller together and runs them until the operator exits.

use std::sync::Arc;

use chatterm_core::{
    create_event_channel, create_line_channel, ChannelConfig, ChatTransport, Console, Controller,
    LineReceiver,
};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::simulated::SimulatedTransport;
use crate::terminal::spawn_line_reader;

pub struct ChatApp {
    config: ClientConfig,
    transport: Arc<SimulatedTransport>,
    channel_config: ChannelConfig,
}

impl ChatApp {
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(SimulatedTransport::from_config(&config.transport));
        Self {
            config,
            transport,
            channel_config: ChannelConfig::default(),
        }
    }

    pub fn transport(&self) -> &SimulatedTransport {
        &self.transport
    }

    /// Run interactively on the terminal
    pub async fn run(&self) -> Result<()> {
        let (line_tx, line_rx) = create_line_channel(&self.channel_config);
        let console = spawn_line_reader(line_tx, self.config.cli.colored_output)?;
        self.run_with(console, line_rx).await
    }

    /// Run with any console and line source
    pub async fn run_with<C: Console>(&self, console: C, lines: LineReceiver) -> Result<()> {
        let (event_tx, event_rx) = create_event_channel(&self.channel_config);
        let interaction = self.config.interaction();
        info!(
            "Starting {} session with the {} transport",
            interaction.profile,
            self.transport.name()
        );

        let mut controller = Controller::new(self.transport.clone(), interaction, console)
            .with_menu_prompt(self.config.cli.prompt.clone());

        self.transport.start(event_tx).await?;
        let result = controller.run(lines, event_rx).await;
        self.transport.shutdown();

        result?;
        info!("Session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chatterm_core::{ChatId, LineSender, RecordingConsole};
    use tokio::time::{sleep, timeout};

    use crate::config::TransportSection;

    fn create_test_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.transport = TransportSection {
            pairing_delay_ms: 1,
            reply_delay_ms: 0,
            chatter_interval_ms: 0,
            ..Default::default()
        };
        config.cli.prompt = "chatterm> ".to_string();
        config
    }

    async fn submit(console: &RecordingConsole, lines: &LineSender, line: &str) {
        let expected = console.prompts().len() + 1;
        lines.send(line.to_string()).await.unwrap();
        wait_for_prompts(console, expected).await;
    }

    async fn wait_for_prompts(console: &RecordingConsole, count: usize) {
        timeout(Duration::from_secs(2), async {
            while console.prompts().len() < count {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_full_session_against_simulated_phone() {
        let app = Arc::new(ChatApp::new(create_test_config()));
        let console = RecordingConsole::new();
        let (line_tx, line_rx) = create_line_channel(&ChannelConfig::default());

        let runner = {
            let app = Arc::clone(&app);
            let console = console.clone();
            tokio::spawn(async move { app.run_with(console, line_rx).await })
        };

        wait_for_prompts(&console, 1).await;
        assert_eq!(console.qr_codes().len(), 1);
        assert_eq!(console.prompts()[0], "chatterm> ");
        assert!(console.contains("0: Alice"));
        assert!(console.contains("4: 15550004"));

        submit(&console, &line_tx, "2").await;
        submit(&console, &line_tx, "0").await;
        assert!(console.contains("Contact status: online"));
        assert!(console.contains("this is the place"));

        submit(&console, &line_tx, "on my way").await;
        assert_eq!(
            app.transport().memory().sent_messages(),
            vec![(ChatId::new("15550001@c.us"), "on my way".to_string())]
        );

        submit(&console, &line_tx, "back").await;
        line_tx.send("4".to_string()).await.unwrap();

        let result = timeout(Duration::from_secs(2), runner).await.unwrap().unwrap();
        assert!(result.is_ok());
        assert!(console.contains("Exiting..."));
    }
}
