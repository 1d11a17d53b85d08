//! Local line input.
//!
//! rustyline blocks, so it runs on its own thread and forwards events over
//! a channel the async send loop can await.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// What the input thread observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// One line, without its terminator
    Line(String),
    /// Ctrl+D or end of piped input
    Eof,
    /// Ctrl+C
    Interrupted,
    /// The terminal could not be read
    Failed(String),
}

/// Start reading lines from the terminal (or piped stdin).
///
/// The thread stops after sending `Eof`, `Interrupted` or `Failed`, or once
/// the receiver is dropped.
pub fn spawn_line_reader() -> mpsc::UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                let _ = tx.send(InputEvent::Failed(e.to_string()));
                return;
            }
        };

        loop {
            let event = match rl.readline("") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(err) => InputEvent::Failed(err.to_string()),
            };

            let last = !matches!(event, InputEvent::Line(_));
            if tx.send(event).is_err() || last {
                break;
            }
        }
    });

    rx
}
