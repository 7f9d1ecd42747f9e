//! Error types for devconsole.
//!
//! Errors are split by concern with `thiserror` and compose into [`AppError`]
//! through `From` conversions, so the binary can use `?` throughout.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`InputError`] - File/stdin reading failures (fatal)
//!   - [`CallError`] - Malformed console call lines (non-fatal, logged and skipped)
//!   - `std::io::Error` - Terminal failures (fatal)
//!   - `ConfigError`, `LoggingError` - Startup failures (fatal)
//!   - `TuiError` - Event loop failures (fatal)
//! - [`TaskError`] - A queued console task failed or panicked. Never leaves
//!   the engine: the ingestion queue logs it and moves on to the next task.
//!
//! # Recovery Strategy
//!
//! The console surface must never take down its host. Producer misuse (bad
//! timer/counter labels) is reported as a warn entry, task failures are
//! isolated per task, and structural misuse such as an unmatched `groupEnd`
//! is a no-op. Only startup, input and terminal failures are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read console calls from file or stdin.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// A console call line could not be decoded.
    #[error("Failed to decode console call: {0}")]
    Call(#[from] CallError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Log file could not be set up.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The event loop stopped with an error.
    #[error(transparent)]
    Tui(#[from] crate::view::TuiError),
}

/// Errors encountered when reading input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// No file argument was given and stdin is an interactive terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors decoding one JSONL console call.
///
/// Each variant carries the 1-based input line so the warning written to the
/// log file can point at the offending line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// Line is not valid JSON or does not have the call shape.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// Line number in the input.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// `method` names no console method.
    #[error("Unknown console method '{method}' at line {line}")]
    UnknownMethod {
        /// Line number in the input.
        line: usize,
        /// The method as written.
        method: String,
    },
}

/// A queued console task failed during a drain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task-specific failure.
    #[error("{0}")]
    Failed(String),

    /// The task panicked; carries the panic message.
    #[error("task panicked: {0}")]
    Panicked(String),
}
