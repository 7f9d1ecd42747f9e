//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the log up by one row. Default: k/Up
    ScrollUp,
    /// Scroll the log down by one row. Default: j/Down
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest entry. Default: g/Home
    ScrollToTop,
    /// Jump to the newest entry and resume following. Default: G/End
    ScrollToBottom,

    // Console
    /// Collapse or expand the first group header on screen. Default: z
    ToggleGroup,
    /// Clear the console. Default: c
    Clear,
    /// Hide or show the log pane. Default: h
    ToggleHidden,

    // Application
    /// Quit the application. Default: q
    Quit,
}
