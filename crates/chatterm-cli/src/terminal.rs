//! Terminal console
//!
//! A rustyline editor runs on its own thread and owns stdin. The controller asks
//! for lines by sending prompts to that thread; every line read comes back over
//! the controller's line channel. Output produced while a prompt is outstanding
//! goes through rustyline's external printer, which redraws the prompt together
//! with whatever the operator has typed so far.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use chatterm_core::{Console, LineSender, Tone};
use crossterm::style::Stylize;
use qrcode::render::unicode;
use qrcode::QrCode;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, ExternalPrinter};
use tracing::{debug, error, warn};

use crate::error::{CliError, Result};

type BoxedPrinter = Box<dyn ExternalPrinter + Send>;

/// [`Console`] backed by the terminal
pub struct TerminalConsole {
    printer: Option<BoxedPrinter>,
    prompts: mpsc::Sender<String>,
    /// Set while the editor is inside `readline`
    reading: Arc<AtomicBool>,
    colored: bool,
}

/// Start the line-editor thread feeding `lines`
///
/// The thread stops when the operator presses Ctrl-C or Ctrl-D, which closes
/// `lines`, or when the returned console is dropped.
pub fn spawn_line_reader(lines: LineSender, colored: bool) -> Result<TerminalConsole> {
    let (prompt_tx, prompt_rx) = mpsc::channel::<String>();
    let (setup_tx, setup_rx) = mpsc::channel::<std::result::Result<Option<BoxedPrinter>, String>>();
    let reading = Arc::new(AtomicBool::new(false));
    let reader_flag = Arc::clone(&reading);

    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    let _ = setup_tx.send(Err(e.to_string()));
                    return;
                }
            };

            let printer = match editor.create_external_printer() {
                Ok(printer) => Some(Box::new(printer) as BoxedPrinter),
                Err(e) => {
                    debug!("External printer unavailable: {}", e);
                    None
                }
            };
            if setup_tx.send(Ok(printer)).is_err() {
                return;
            }

            while let Ok(prompt) = prompt_rx.recv() {
                reader_flag.store(true, Ordering::SeqCst);
                let result = editor.readline(&prompt);
                reader_flag.store(false, Ordering::SeqCst);

                match result {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        if lines.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        debug!("Operator closed the input");
                        break;
                    }
                    Err(e) => {
                        error!("Line editor failed: {}", e);
                        break;
                    }
                }
            }
        })?;

    let printer = setup_rx
        .recv()
        .map_err(|_| CliError::Terminal("Line reader exited during setup".to_string()))?
        .map_err(CliError::Terminal)?;

    Ok(TerminalConsole {
        printer,
        prompts: prompt_tx,
        reading,
        colored,
    })
}

impl TerminalConsole {
    fn paint(&self, tone: Tone, line: &str) -> String {
        if !self.colored {
            return line.to_string();
        }
        match tone {
            Tone::Plain => line.to_string(),
            Tone::Menu => line.cyan().to_string(),
            Tone::Success => line.green().to_string(),
            Tone::Notice => line.yellow().to_string(),
            Tone::Error => line.red().to_string(),
        }
    }

    fn emit(&mut self, text: String) {
        if self.reading.load(Ordering::SeqCst) {
            if let Some(printer) = self.printer.as_mut() {
                match printer.print(format!("{}\n", text)) {
                    Ok(()) => return,
                    Err(e) => warn!("External printer failed: {}", e),
                }
            }
        }
        println!("{}", text);
    }
}

impl Console for TerminalConsole {
    fn print(&mut self, tone: Tone, line: &str) {
        let text = self.paint(tone, line);
        self.emit(text);
    }

    fn prompt(&mut self, prompt: &str) {
        if self.prompts.send(prompt.to_string()).is_err() {
            warn!("Line reader is gone; prompt dropped");
        }
    }

    fn show_qr(&mut self, code: &str) {
        match render_qr(code) {
            Some(image) => self.emit(image),
            None => self.print(Tone::Notice, code),
        }
    }
}

/// Render a pairing code as a compact Unicode QR image
pub fn render_qr(code: &str) -> Option<String> {
    let qr = QrCode::new(code.as_bytes()).ok()?;
    Some(
        qr.render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .quiet_zone(true)
            .build(),
    )
}
