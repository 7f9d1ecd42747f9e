//! Producer-facing console calls.
//!
//! Every call is turned into a task on the ingestion queue; nothing touches
//! console state until the next drain. Calls whose input makes them a no-op
//! (`log()` without arguments, `table()` without data) never reach the queue.

use super::{ConsoleState, Overlay};
use crate::model::{is_falsy, ConsoleCall, EntryId, EntryKind, LogEntry};
use crate::view_state::RenderSurface;
use serde_json::Value;

impl<E, S> Overlay<E, S>
where
    E: LogEntry + 'static,
    S: RenderSurface<Key = EntryId>,
{
    fn enqueue<F>(&mut self, task: F)
    where
        F: FnOnce(&mut ConsoleState<E>) + 'static,
    {
        self.queue.enqueue(self.now, move |state| {
            task(state);
            Ok(())
        });
    }

    fn output(&mut self, kind: EntryKind, args: Vec<Value>) {
        if args.is_empty() {
            return;
        }
        self.enqueue(move |state| state.attach(E::create(kind, args)));
    }

    /// `console.log`
    pub fn log(&mut self, args: Vec<Value>) {
        self.output(EntryKind::Log, args);
    }

    /// `console.info`
    pub fn info(&mut self, args: Vec<Value>) {
        self.output(EntryKind::Info, args);
    }

    /// `console.debug`
    pub fn debug(&mut self, args: Vec<Value>) {
        self.output(EntryKind::Debug, args);
    }

    /// `console.warn`
    pub fn warn(&mut self, args: Vec<Value>) {
        self.output(EntryKind::Warn, args);
    }

    /// `console.error`
    pub fn error(&mut self, args: Vec<Value>) {
        self.output(EntryKind::Error, args);
    }

    /// `console.group`: open an expanded group.
    pub fn group(&mut self, args: Vec<Value>) {
        let args = with_fallback_label(args, "console.group");
        self.enqueue(move |state| state.attach(E::create(EntryKind::Group, args)));
    }

    /// `console.groupCollapsed`: open a collapsed group.
    pub fn group_collapsed(&mut self, args: Vec<Value>) {
        let args = with_fallback_label(args, "console.groupCollapsed");
        self.enqueue(move |state| state.attach(E::create(EntryKind::GroupCollapsed, args)));
    }

    /// `console.groupEnd`: close the innermost group. No-op when none is open.
    pub fn group_end(&mut self) {
        self.enqueue(|state| state.end_group());
    }

    /// `console.count`
    pub fn count(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.enqueue(move |state| state.increment_counter(label));
    }

    /// `console.countReset`
    pub fn count_reset(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.enqueue(move |state| state.reset_counter(label));
    }

    /// `console.time`. A duplicate label warns and keeps the original start.
    pub fn time(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.enqueue(move |state| state.start_timer(label));
    }

    /// `console.timeLog`
    pub fn time_log(&mut self, label: impl Into<String>, args: Vec<Value>) {
        let label = label.into();
        self.enqueue(move |state| state.report_timer(label, args, false));
    }

    /// `console.timeEnd`
    pub fn time_end(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.enqueue(move |state| state.report_timer(label, Vec::new(), true));
    }

    /// `console.table`. Ignored when the data argument is missing or falsy.
    pub fn table(&mut self, args: Vec<Value>) {
        if args.first().map_or(true, is_falsy) {
            return;
        }
        self.enqueue(move |state| state.attach(E::create(EntryKind::Table, args)));
    }

    /// `console.trace`
    pub fn trace(&mut self, args: Vec<Value>) {
        let args = with_fallback_label(args, "console.trace");
        self.enqueue(move |state| state.attach(E::create(EntryKind::Trace, args)));
    }

    /// `console.assert`: logs an error only when `condition` is false.
    pub fn assert(&mut self, condition: bool, args: Vec<Value>) {
        if condition {
            return;
        }
        let mut message = Vec::with_capacity(args.len() + 1);
        message.push(Value::String("Assertion failed:".to_string()));
        message.extend(args);
        self.enqueue(move |state| state.attach(E::create(EntryKind::Error, message)));
    }

    /// `console.clear`: drop history, groups and counters.
    ///
    /// Runs as a queued task, so calls made before it are still attached
    /// (and then dropped) in order.
    pub fn clear(&mut self) {
        self.enqueue(|state| state.clear());
    }

    /// Route a decoded call to the matching console method.
    pub fn dispatch(&mut self, call: ConsoleCall) {
        match call {
            ConsoleCall::Log(args) => self.log(args),
            ConsoleCall::Info(args) => self.info(args),
            ConsoleCall::Debug(args) => self.debug(args),
            ConsoleCall::Warn(args) => self.warn(args),
            ConsoleCall::Error(args) => self.error(args),
            ConsoleCall::Group(args) => self.group(args),
            ConsoleCall::GroupCollapsed(args) => self.group_collapsed(args),
            ConsoleCall::GroupEnd => self.group_end(),
            ConsoleCall::Count(label) => self.count(label),
            ConsoleCall::CountReset(label) => self.count_reset(label),
            ConsoleCall::Time(label) => self.time(label),
            ConsoleCall::TimeLog(label, args) => self.time_log(label, args),
            ConsoleCall::TimeEnd(label) => self.time_end(label),
            ConsoleCall::Table(args) => self.table(args),
            ConsoleCall::Trace(args) => self.trace(args),
            ConsoleCall::Assert(condition, args) => self.assert(condition, args),
            ConsoleCall::Clear => self.clear(),
        }
    }
}

/// Replace a missing or falsy first argument with `fallback`.
fn with_fallback_label(mut args: Vec<Value>, fallback: &str) -> Vec<Value> {
    let fallback = Value::String(fallback.to_string());
    match args.first_mut() {
        Some(first) if is_falsy(first) => *first = fallback,
        Some(_) => {}
        None => args.push(fallback),
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_fills_missing_label() {
        assert_eq!(
            with_fallback_label(vec![], "console.group"),
            vec![json!("console.group")]
        );
    }

    #[test]
    fn fallback_replaces_falsy_label_only() {
        assert_eq!(
            with_fallback_label(vec![json!(""), json!(1)], "console.trace"),
            vec![json!("console.trace"), json!(1)]
        );
        assert_eq!(
            with_fallback_label(vec![json!("named")], "console.trace"),
            vec![json!("named")]
        );
    }
}
