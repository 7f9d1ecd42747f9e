//! Terminal implementation of the entry collaborator.

use super::constants::{COLLAPSED_MARKER, EXPANDED_MARKER, GROUP_INDENT};
use super::format::{format_args, format_table, wrap};
use crate::model::{ChangeCallback, EntryId, EntryKind, GroupId, LogEntry, ResizeCallback};
use chrono::{DateTime, Local};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// One console entry rendered as wrapped terminal rows.
///
/// Text is formatted once at creation. Rows are rebuilt by `update_size`
/// whenever the width changes or the entry is marked dirty by a repeat or a
/// collapse toggle, since both change the prefix in front of the text.
pub struct TextEntry {
    kind: EntryKind,
    args: Vec<Value>,
    text: String,
    rows: Vec<String>,
    count: u32,
    timestamp: DateTime<Local>,
    group_stack: Vec<GroupId>,
    last_log: Option<EntryId>,
    collapsed: bool,
    width: u16,
    dirty: bool,
    change_listeners: Vec<ChangeCallback>,
    resize_listeners: Vec<ResizeCallback>,
}

impl std::fmt::Debug for TextEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEntry")
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("count", &self.count)
            .field("group_stack", &self.group_stack)
            .field("collapsed", &self.collapsed)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl TextEntry {
    /// Formatted text before wrapping.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Arguments the entry was created from.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Rows as of the last measurement.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// When the entry was created.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Timestamp as shown in the gutter.
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format("%H:%M:%S%.3f").to_string()
    }

    /// Entry attached right before this one.
    pub fn last_log(&self) -> Option<EntryId> {
        self.last_log
    }

    /// Whether this entry heads a group.
    pub fn is_group_header(&self) -> bool {
        self.kind.opens_group()
    }

    /// Own collapse flag of a group header. Always false for other entries.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Flip a group header between collapsed and expanded.
    ///
    /// Notifies change listeners with the new flag. Returns false (and does
    /// nothing) for entries that are not group headers.
    pub fn toggle(&mut self) -> bool {
        if !self.is_group_header() {
            return false;
        }
        self.collapsed = !self.collapsed;
        self.dirty = true;
        let collapsed = self.collapsed;
        for listener in &mut self.change_listeners {
            listener(collapsed);
        }
        true
    }

    fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.is_group_header() {
            prefix.push_str(if self.collapsed {
                COLLAPSED_MARKER
            } else {
                EXPANDED_MARKER
            });
        }
        if self.count > 1 {
            prefix.push_str(&format!("({}) ", self.count));
        }
        prefix
    }
}

impl LogEntry for TextEntry {
    fn create(kind: EntryKind, args: Vec<Value>) -> Self {
        let text = match kind {
            EntryKind::Table => args
                .first()
                .map(|data| format_table(data, args.get(1)).join("\n"))
                .unwrap_or_default(),
            _ => format_args(&args),
        };

        Self {
            kind,
            args,
            text,
            rows: Vec::new(),
            count: 1,
            timestamp: Local::now(),
            group_stack: Vec::new(),
            last_log: None,
            collapsed: kind == EntryKind::GroupCollapsed,
            width: 0,
            dirty: false,
            change_listeners: Vec::new(),
            resize_listeners: Vec::new(),
        }
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn equals(&self, other: &Self) -> bool {
        self.kind == other.kind && !self.kind.opens_group() && self.args == other.args
    }

    fn add_count(&mut self) {
        self.count += 1;
        self.dirty = true;
        for listener in &mut self.resize_listeners {
            listener();
        }
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn set_last_log(&mut self, prev: Option<EntryId>) {
        self.last_log = prev;
    }

    fn set_group_stack(&mut self, ids: &[GroupId]) {
        self.group_stack = ids.to_vec();
    }

    fn group_stack(&self) -> &[GroupId] {
        &self.group_stack
    }

    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn update_size(&mut self, container_width: u16) {
        let indent = " ".repeat(GROUP_INDENT * self.group_stack.len());
        let prefix = self.prefix();
        let hanging = " ".repeat(prefix.width());
        let available = usize::from(container_width)
            .saturating_sub(indent.len() + prefix.width())
            .max(1);

        self.rows = wrap(&self.text, available)
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let lead = if i == 0 { &prefix } else { &hanging };
                format!("{indent}{lead}{row}")
            })
            .collect();
        self.width = container_width;
        self.dirty = false;
    }

    fn needs_measure(&self, container_width: u16) -> bool {
        self.dirty || self.rows.is_empty() || self.width != container_width
    }

    fn on_change(&mut self, callback: ChangeCallback) {
        self.change_listeners.push(callback);
    }

    fn on_resize(&mut self, callback: ResizeCallback) {
        self.resize_listeners.push(callback);
    }
}
