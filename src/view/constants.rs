//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values to enable
//! consistent tuning across the application.

/// Height of the status bar in lines.
///
/// Single line for entry counts, live state and keyboard hints.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Columns of indentation per enclosing group.
pub const GROUP_INDENT: usize = 2;

/// Marker in front of an expanded group header.
pub const EXPANDED_MARKER: &str = "▾ ";

/// Marker in front of a collapsed group header.
pub const COLLAPSED_MARKER: &str = "▸ ";

/// Width of the timestamp gutter, including its trailing space.
pub const TIMESTAMP_WIDTH: u16 = 13;

/// Narrowest terminal that still shows the timestamp gutter.
pub const MIN_WIDTH_FOR_TIMESTAMPS: u16 = 60;

/// Upper bound on how long the event loop sleeps without a deadline.
///
/// Keeps stdin and followed files polled while nothing else is scheduled.
pub const IDLE_POLL_INTERVAL_MS: u64 = 100;
