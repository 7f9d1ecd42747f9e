//! The entry collaborator interface.
//!
//! The overlay engine never formats or measures content itself. It drives
//! entries through [`LogEntry`], which a presentation layer implements
//! (see `view::TextEntry` for the terminal implementation).

use super::identifiers::{EntryId, GroupId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The console method that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    /// Plain output.
    Log,
    /// Informational output.
    Info,
    /// Verbose output.
    Debug,
    /// Warning, also used for counter and timer misuse.
    Warn,
    /// Error, also used for failed assertions.
    Error,
    /// Expanded group header.
    Group,
    /// Collapsed group header.
    GroupCollapsed,
    /// Group close marker. Never attached as an entry.
    GroupEnd,
    /// Tabular data.
    Table,
    /// Stack trace.
    Trace,
    /// "Console was cleared" marker.
    Clear,
}

impl EntryKind {
    /// Whether attaching an entry of this kind opens a new group scope.
    pub fn opens_group(&self) -> bool {
        matches!(self, EntryKind::Group | EntryKind::GroupCollapsed)
    }

    /// Method name as a producer would spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Log => "log",
            EntryKind::Info => "info",
            EntryKind::Debug => "debug",
            EntryKind::Warn => "warn",
            EntryKind::Error => "error",
            EntryKind::Group => "group",
            EntryKind::GroupCollapsed => "groupCollapsed",
            EntryKind::GroupEnd => "groupEnd",
            EntryKind::Table => "table",
            EntryKind::Trace => "trace",
            EntryKind::Clear => "clear",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fired by a group entry when its own collapse toggle changes.
/// The argument is the new `collapsed` value.
pub type ChangeCallback = Box<dyn FnMut(bool)>;

/// Fired when an entry's content changes in a way that affects its size.
pub type ResizeCallback = Box<dyn FnMut()>;

/// Notification an entry raised since the last overlay tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEvent {
    /// Content changed size; the window must be recomputed.
    Resized(EntryId),
    /// A group header was collapsed or expanded by the user.
    Toggled {
        /// The group header entry.
        entry: EntryId,
        /// New collapse flag.
        collapsed: bool,
    },
}

/// A renderable log unit as seen by the overlay engine.
///
/// # Contract
///
/// - `height()` and `width()` are 0 until the first `update_size`.
/// - `equals` decides repeat detection; returning `true` makes the overlay
///   call `add_count` on the previous entry instead of appending this one.
/// - Callbacks registered through `on_change`/`on_resize` may be invoked at
///   any time from the owning thread; the overlay handles them on its next
///   tick.
pub trait LogEntry {
    /// Build an entry from a console call.
    fn create(kind: EntryKind, args: Vec<Value>) -> Self
    where
        Self: Sized;

    /// Console method that produced this entry.
    fn kind(&self) -> EntryKind;

    /// Structural repeat check against the previously attached entry.
    fn equals(&self, other: &Self) -> bool;

    /// Bump the repeat counter.
    fn add_count(&mut self);

    /// Current repeat count (1 for a fresh entry).
    fn count(&self) -> u32;

    /// Record the entry attached right before this one.
    fn set_last_log(&mut self, prev: Option<EntryId>);

    /// Stamp the enclosing group scopes, outermost first.
    fn set_group_stack(&mut self, ids: &[GroupId]);

    /// Enclosing group scopes, outermost first.
    fn group_stack(&self) -> &[GroupId];

    /// Innermost enclosing group, if any.
    fn group_id(&self) -> Option<GroupId> {
        self.group_stack().last().copied()
    }

    /// Last measured height in surface rows.
    fn height(&self) -> usize;

    /// Surface width the height was measured at.
    fn width(&self) -> u16;

    /// Measure content at the given container width.
    fn update_size(&mut self, container_width: u16);

    /// Whether the cached size is stale for `container_width`.
    fn needs_measure(&self, container_width: u16) -> bool {
        self.height() == 0 || self.width() != container_width
    }

    /// Subscribe to collapse toggles (only meaningful for group headers).
    fn on_change(&mut self, callback: ChangeCallback);

    /// Subscribe to size-affecting content changes.
    fn on_resize(&mut self, callback: ResizeCallback);
}
