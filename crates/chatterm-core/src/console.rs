//! Console abstraction
//!
//! The controller writes through a [`Console`]: lines may be printed at any time
//! (also while a prompt is outstanding), and exactly one prompt is requested per
//! expected operator line.

use std::sync::{Arc, Mutex, MutexGuard};

/// Semantic coloring hint for a printed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// Menu entries
    Menu,
    /// Confirmations (selection, delivery)
    Success,
    /// Live and passive message notifications
    Notice,
    /// Recoverable failures
    Error,
}

/// Output sink and prompt source of the controller
pub trait Console: Send {
    /// Print one line without disturbing an outstanding prompt
    fn print(&mut self, tone: Tone, line: &str);

    /// Ask for the next operator line under `prompt`
    fn prompt(&mut self, prompt: &str);

    /// Present a pairing challenge
    fn show_qr(&mut self, code: &str) {
        self.print(Tone::Notice, code);
    }
}

// ----------------------------------------------------------------------------
// Recording Console
// ----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Recording {
    lines: Vec<(Tone, String)>,
    prompts: Vec<String>,
    qr_codes: Vec<String>,
}

/// Console that keeps everything in memory
///
/// Clones share the same buffer, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Printed lines without tones
    pub fn lines(&self) -> Vec<String> {
        self.recording().lines.iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn lines_with_tone(&self, tone: Tone) -> Vec<String> {
        self.recording()
            .lines
            .iter()
            .filter(|(line_tone, _)| *line_tone == tone)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.recording().prompts.clone()
    }

    pub fn qr_codes(&self) -> Vec<String> {
        self.recording().qr_codes.clone()
    }

    /// Whether any printed line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.recording().lines.iter().any(|(_, line)| line.contains(needle))
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        let mut recording = self.recording();
        recording.lines.clear();
        recording.prompts.clear();
        recording.qr_codes.clear();
    }
}

impl Console for RecordingConsole {
    fn print(&mut self, tone: Tone, line: &str) {
        self.recording().lines.push((tone, line.to_string()));
    }

    fn prompt(&mut self, prompt: &str) {
        self.recording().prompts.push(prompt.to_string());
    }

    fn show_qr(&mut self, code: &str) {
        self.recording().qr_codes.push(code.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let console = RecordingConsole::new();
        let mut handle = console.clone();

        handle.print(Tone::Error, "boom");
        handle.prompt("> ");

        assert_eq!(console.lines(), vec!["boom"]);
        assert_eq!(console.lines_with_tone(Tone::Error), vec!["boom"]);
        assert_eq!(console.prompts(), vec!["> "]);
        assert!(console.contains("oo"));

        console.clear();
        assert!(console.lines().is_empty());
    }
}
