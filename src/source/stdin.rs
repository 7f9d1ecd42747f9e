//! Stdin-based console call source for piped input.
//!
//! A background thread owns the blocking reader and forwards lines over a
//! channel so the event loop can poll without blocking.

use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, warn};

enum StdinMessage {
    Line(String),
    Eof,
    Failed(std::io::Error),
}

/// Stdin source for piped JSONL input.
///
/// Supports both streaming (`producer | devconsole`) and complete input
/// (`cat calls.jsonl | devconsole`). The source is live until the reader
/// thread reports EOF.
pub struct StdinSource {
    rx: Receiver<StdinMessage>,
    complete: bool,
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl StdinSource {
    /// Create a source reading the process stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal,
    /// so the viewer never blocks waiting for keyboard input.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }

    /// Create a source from any reader. Bypasses the terminal check.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let reader = BufReader::new(reader);
            for line in reader.lines() {
                let message = match line {
                    Ok(line) => StdinMessage::Line(line),
                    Err(e) => {
                        let _ = tx.send(StdinMessage::Failed(e));
                        return;
                    }
                };
                if tx.send(message).is_err() {
                    return;
                }
            }
            let _ = tx.send(StdinMessage::Eof);
        });

        Self {
            rx,
            complete: false,
        }
    }

    /// Drain every line received so far, newline stripped. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader thread hit a read error. The
    /// source is complete afterwards.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>, InputError> {
        let mut lines = Vec::new();
        while !self.complete {
            match self.rx.try_recv() {
                Ok(StdinMessage::Line(line)) => lines.push(line),
                Ok(StdinMessage::Eof) => {
                    debug!(lines = lines.len(), "Stdin reached EOF");
                    self.complete = true;
                }
                Ok(StdinMessage::Failed(e)) => {
                    warn!(error = %e, "Stdin read failed");
                    self.complete = true;
                    return Err(InputError::Io(e));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.complete = true,
            }
        }
        Ok(lines)
    }

    /// Whether EOF has been reached (no more data will arrive).
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
