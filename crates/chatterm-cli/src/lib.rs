//! chatterm CLI library
//!
//! Terminal front end of the chatterm client: configuration loading, the
//! rustyline-backed console, the simulated transport and the orchestrator that
//! wires them to the interaction controller.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod simulated;
pub mod terminal;

pub use app::ChatApp;
pub use cli::{Cli, Commands};
pub use config::{ClientConfig, CliOverrides, ConfigError};
pub use error::{CliError, Result};
pub use simulated::SimulatedTransport;
pub use terminal::{spawn_line_reader, TerminalConsole};
