//! Command-line interface definitions and parsing

use std::path::PathBuf;

use chatterm_core::Profile;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interaction profile (basic or extended)
    #[arg(short, long)]
    pub profile: Option<Profile>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat client (default)
    Chat,
    /// Print an example configuration file
    Config,
}

impl Cli {
    /// The subcommand to run, defaulting to `chat`
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Chat)
    }
}
