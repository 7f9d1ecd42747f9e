//! Single-line status bar.

use ratatui::text::{Line, Span};

/// What the status bar reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    /// Entries in the log history.
    pub entries: usize,
    /// Entries passing the group filter.
    pub visible: usize,
    /// Producer calls not yet drained.
    pub pending: usize,
    /// Whether the input can still deliver calls.
    pub live: bool,
    /// Whether the console is hidden.
    pub hidden: bool,
}

const HINTS: &str = "j/k scroll  z group  c clear  h hide  q quit";

/// Render the status line.
pub fn status_line(info: StatusInfo) -> Line<'static> {
    let mut text = format!("{} entries, {} shown", info.entries, info.visible);
    if info.pending > 0 {
        text.push_str(&format!(", {} queued", info.pending));
    }
    text.push_str(if info.live { "  [LIVE]" } else { "  [EOF]" });
    if info.hidden {
        text.push_str("  [HIDDEN]");
    }

    Line::from(vec![
        Span::raw(format!(" {text}")),
        Span::raw("  |  "),
        Span::raw(HINTS),
    ])
}
