//! Console state mutated by queued tasks.

use crate::model::{EntryEvent, EntryId, EntryKind, GroupId, LogEntry};
use crate::state::{GroupStateMachine, LogStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::debug;

/// What the next attached entry is compared against for repeat detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LastAttached {
    None,
    Entry(EntryId),
    /// A `groupEnd` ran; nothing merges across a group boundary.
    GroupEnd,
}

impl LastAttached {
    fn entry(self) -> Option<EntryId> {
        match self {
            LastAttached::Entry(id) => Some(id),
            LastAttached::None | LastAttached::GroupEnd => None,
        }
    }
}

/// Everything the ingestion queue's tasks operate on.
///
/// Owned by one overlay; tasks get `&mut` access while the queue drains.
pub struct ConsoleState<E> {
    pub(crate) logs: LogStore<E>,
    pub(crate) groups: GroupStateMachine,
    /// Group opened by each group header entry.
    pub(crate) headers: HashMap<EntryId, GroupId>,
    pub(crate) last: LastAttached,
    pub(crate) counters: HashMap<String, u64>,
    pub(crate) timers: HashMap<String, Instant>,
    /// Set by any mutation that needs the window recomputed.
    pub(crate) render_requested: bool,
    /// Set by `clear`; scroll history from before it is stale.
    pub(crate) cleared: bool,
    /// Clock of the drain currently running.
    pub(crate) now: Instant,
    events: Sender<EntryEvent>,
}

impl<E: LogEntry> ConsoleState<E> {
    pub(crate) fn new(events: Sender<EntryEvent>, now: Instant) -> Self {
        Self {
            logs: LogStore::new(),
            groups: GroupStateMachine::new(),
            headers: HashMap::new(),
            last: LastAttached::None,
            counters: HashMap::new(),
            timers: HashMap::new(),
            render_requested: false,
            cleared: false,
            now,
            events,
        }
    }

    /// Attach a new entry, or fold it into the previous one if it repeats.
    pub(crate) fn attach(&mut self, mut entry: E) {
        self.render_requested = true;

        if let Some(prev) = self.last.entry() {
            if let Some(last) = self.logs.get_mut(prev) {
                if last.equals(&entry) {
                    last.add_count();
                    return;
                }
            }
        }

        let id = self.logs.next_id();
        entry.set_last_log(self.last.entry());
        entry.set_group_stack(self.groups.active_stack());

        let resized = self.events.clone();
        entry.on_resize(Box::new(move || {
            // Receiver only disappears with the overlay itself.
            let _ = resized.send(EntryEvent::Resized(id));
        }));

        let kind = entry.kind();
        if kind.opens_group() {
            let group = self.groups.open(kind == EntryKind::GroupCollapsed);
            self.headers.insert(id, group);

            let toggled = self.events.clone();
            entry.on_change(Box::new(move |collapsed| {
                let _ = toggled.send(EntryEvent::Toggled {
                    entry: id,
                    collapsed,
                });
            }));
        }

        self.logs.push(entry);
        self.last = LastAttached::Entry(id);
    }

    /// Attach a fresh entry built from plain text.
    pub(crate) fn attach_message(&mut self, kind: EntryKind, message: String) {
        self.attach(E::create(kind, vec![Value::String(message)]));
    }

    pub(crate) fn end_group(&mut self) {
        self.groups.close();
        self.last = LastAttached::GroupEnd;
    }

    pub(crate) fn increment_counter(&mut self, label: String) {
        let count = self.counters.entry(label.clone()).or_insert(0);
        *count += 1;
        let message = format!("{label}: {count}");
        self.attach_message(EntryKind::Log, message);
    }

    pub(crate) fn reset_counter(&mut self, label: String) {
        match self.counters.get_mut(&label) {
            Some(count) => *count = 0,
            None => self.attach_message(
                EntryKind::Warn,
                format!("Count for '{label}' does not exist"),
            ),
        }
    }

    pub(crate) fn start_timer(&mut self, label: String) {
        if self.timers.contains_key(&label) {
            self.attach_message(EntryKind::Warn, format!("Timer '{label}' already exists"));
            return;
        }
        self.timers.insert(label, self.now);
    }

    /// Log the elapsed time of a timer, optionally stopping it.
    pub(crate) fn report_timer(&mut self, label: String, extra: Vec<Value>, stop: bool) {
        let started = if stop {
            self.timers.remove(&label)
        } else {
            self.timers.get(&label).copied()
        };
        let Some(started) = started else {
            self.attach_message(EntryKind::Warn, format!("Timer '{label}' does not exist"));
            return;
        };

        let elapsed = self.now.saturating_duration_since(started);
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(Value::String(format!(
            "{label}: {}ms",
            format_millis(elapsed.as_secs_f64() * 1000.0)
        )));
        args.extend(extra);
        self.attach(E::create(EntryKind::Log, args));
    }

    /// Drop entries, groups and counters, leaving one cleared marker.
    ///
    /// Timers survive; only `timeEnd` removes them.
    pub(crate) fn clear(&mut self) {
        let dropped = self.logs.len();
        self.logs.clear();
        self.groups.reset();
        self.headers.clear();
        self.counters.clear();
        self.last = LastAttached::None;
        self.cleared = true;
        debug!(dropped, "Console cleared");

        self.attach_message(EntryKind::Clear, "Console was cleared".to_string());
    }

    /// Apply a collapse toggle raised by a group header.
    ///
    /// Returns `false` for headers that no longer exist (cleared since).
    pub(crate) fn toggle(&mut self, entry: EntryId, collapsed: bool) -> bool {
        let Some(group) = self.headers.get(&entry).copied() else {
            return false;
        };
        let changed = self.groups.set_collapsed(group, collapsed);
        self.render_requested |= changed;
        changed
    }
}

/// Milliseconds with at most three decimals and no trailing zeros.
fn format_millis(ms: f64) -> String {
    let text = format!("{ms:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}
