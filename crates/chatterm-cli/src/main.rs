//! chatterm - terminal chat client entry point

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use chatterm_cli::{
    app::ChatApp,
    cli::{Cli, Commands},
    config::{ClientConfig, CliOverrides},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.command() == Commands::Config {
        print!("{}", ClientConfig::example_config());
        return Ok(());
    }

    let config = ClientConfig::load_with_overrides(&CliOverrides {
        config_file: cli.config.clone(),
        profile: cli.profile,
        verbose: cli.verbose,
        no_color: cli.no_color,
    })?;

    setup_logging(config.cli.verbose, config.cli.log_file.as_deref())?;
    info!("Loaded configuration (profile {})", config.interaction.profile);

    let app = ChatApp::new(config);
    app.run().await?;

    info!("chatterm exited successfully");
    Ok(())
}

/// Setup logging based on verbosity level
///
/// stdout belongs to the interactive session, so logs go to stderr or a file.
fn setup_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
