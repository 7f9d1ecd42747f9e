//! Snapshot tests for the console pane
//!
//! Uses insta + ratatui buffers to verify rendering output doesn't regress.

use devconsole::overlay::{Overlay, OverlayOptions};
use devconsole::view::{ConsolePane, EntryStyles, TextEntry};
use devconsole::view_state::{TolerancePolicy, Viewport};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use serde_json::json;
use std::time::{Duration, Instant};

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Empty lines are removed to keep snapshots clean.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

fn render(overlay: &Overlay<TextEntry>, width: u16, height: u16) -> String {
    let styles = EntryStyles::default();
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    ConsolePane::new(overlay, &styles, false).render(area, &mut buffer);
    buffer_to_string(&buffer)
}

fn console(width: u16, height: usize) -> Overlay<TextEntry> {
    let options = OverlayOptions {
        throttle: Duration::ZERO,
        tolerance: TolerancePolicy {
            min: 0,
            max: 0,
            stalled: 0,
            default_margin: 0,
            ..TolerancePolicy::default()
        },
        ..OverlayOptions::default()
    };
    Overlay::new(options, Viewport::new(width, height))
}

fn settle(overlay: &mut Overlay<TextEntry>) {
    let start = Instant::now();
    for step in 1..=4 {
        overlay.tick(start + Duration::from_millis(step));
    }
}

// ===== Snapshots =====

#[test]
fn snapshot_groups_and_repeats() {
    let mut overlay = console(40, 10);
    for _ in 0..3 {
        overlay.log(vec![json!("tick"), json!(1)]);
    }
    overlay.group(vec![json!("outer")]);
    overlay.log(vec![json!("a1")]);
    overlay.group_collapsed(vec![json!("inner")]);
    overlay.log(vec![json!("b1")]);
    overlay.group_end();
    overlay.group_end();
    overlay.log(vec![json!("after")]);
    settle(&mut overlay);

    insta::assert_snapshot!(render(&overlay, 40, 10), @r"
    (3) tick 1
    ▾ outer
      a1
      ▸ inner
    after
    ");
}

#[test]
fn snapshot_wrapped_entry_uses_hanging_indent() {
    let mut overlay = console(12, 10);
    overlay.group(vec![json!("G")]);
    overlay.warn(vec![json!("alpha beta gamma")]);
    settle(&mut overlay);

    // Indent 2 leaves 10 columns per row.
    insta::assert_snapshot!(render(&overlay, 12, 10), @r"
    ▾ G
      alpha beta
      gamma
    ");
}
