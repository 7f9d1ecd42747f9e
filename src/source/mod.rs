//! Console call input sources.
//!
//! This module provides input sources for JSONL console calls:
//! - File input, read once or followed as it grows
//! - Stdin for piped input (live streaming)
//! - Unified InputSource enum for both
//!
//! Lines are decoded at this boundary. A malformed line is logged and
//! skipped; it never stops the stream.

use crate::model::error::InputError;
use crate::model::ConsoleCall;
use std::path::PathBuf;
use tracing::warn;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Decodes lines into calls, counting lines across polls.
#[derive(Debug, Default)]
struct LineDecoder {
    line_number: usize,
    skipped: usize,
}

impl LineDecoder {
    fn decode(&mut self, lines: Vec<String>) -> Vec<ConsoleCall> {
        let mut calls = Vec::with_capacity(lines.len());
        for line in lines {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            match ConsoleCall::parse(&line, self.line_number) {
                Ok(call) => calls.push(call),
                Err(e) => {
                    self.skipped += 1;
                    warn!(error = %e, "Skipping malformed console call");
                }
            }
        }
        calls
    }
}

/// Where console calls are read from.
#[derive(Debug)]
pub enum InputSourceKind {
    /// A JSONL file.
    File(FileSource),
    /// Piped stdin.
    Stdin(StdinSource),
}

/// Unified input source for JSONL console calls.
#[derive(Debug)]
pub struct InputSource {
    kind: InputSourceKind,
    decoder: LineDecoder,
}

impl InputSource {
    /// Wrap a file source.
    pub fn file(source: FileSource) -> Self {
        Self::from_kind(InputSourceKind::File(source))
    }

    /// Wrap a stdin source.
    pub fn stdin(source: StdinSource) -> Self {
        Self::from_kind(InputSourceKind::Stdin(source))
    }

    fn from_kind(kind: InputSourceKind) -> Self {
        Self {
            kind,
            decoder: LineDecoder::default(),
        }
    }

    /// The underlying source.
    pub fn kind(&self) -> &InputSourceKind {
        &self.kind
    }

    /// Poll for new calls. Non-blocking.
    ///
    /// # Behavior:
    /// - File: everything on the first call; with follow, appended lines after
    /// - Stdin: incremental as data arrives
    ///
    /// # Errors
    ///
    /// Returns `InputError` for I/O errors. Malformed lines are not errors.
    pub fn poll(&mut self) -> Result<Vec<ConsoleCall>, InputError> {
        let lines = match &mut self.kind {
            InputSourceKind::File(f) => f.read_new_lines()?,
            InputSourceKind::Stdin(s) => s.read_new_lines()?,
        };
        Ok(self.decoder.decode(lines))
    }

    /// Check if the source can still produce calls.
    ///
    /// # Behavior:
    /// - File: true while following, false once a one-shot read is done
    /// - Stdin: true until EOF is reached
    pub fn is_live(&self) -> bool {
        match &self.kind {
            InputSourceKind::File(f) => f.is_following() || !f.is_finished(),
            InputSourceKind::Stdin(s) => !s.is_complete(),
        }
    }

    /// Lines read so far, including blank and malformed ones.
    pub fn lines_read(&self) -> usize {
        self.decoder.line_number
    }

    /// Malformed lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.decoder.skipped
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If a file path is provided: open it as a FileSource
/// 2. Else if stdin is piped: use StdinSource
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
pub fn detect_input_source(file: Option<PathBuf>, follow: bool) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::file(FileSource::new(path, follow)?)),
        None => Ok(InputSource::stdin(StdinSource::new()?)),
    }
}
