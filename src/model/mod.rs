//! Domain model types (pure).
//!
//! Identifiers, the entry collaborator interface, decoded console calls,
//! keyboard actions, and the error taxonomy.

pub mod call;
pub mod entry;
pub mod error;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use call::{is_falsy, label_of, ConsoleCall, DEFAULT_LABEL};
pub use entry::{ChangeCallback, EntryEvent, EntryKind, LogEntry, ResizeCallback};
pub use error::{AppError, CallError, InputError, TaskError};
pub use identifiers::{EntryId, GroupId};
pub use key_action::KeyAction;
