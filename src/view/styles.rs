//! Entry kind styling.
//!
//! Provides distinct colors per console method (warn, error, group headers...).

use crate::model::EntryKind;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== EntryStyles =====

/// Styles for entry rows, the timestamp gutter and the status bar.
#[derive(Debug, Clone, Copy)]
pub struct EntryStyles {
    colors: bool,
}

impl EntryStyles {
    /// Styles honoring the given color configuration.
    ///
    /// Without colors only modifiers (bold, dim) are applied.
    pub fn with_color_config(config: ColorConfig) -> Self {
        Self {
            colors: config.colors_enabled(),
        }
    }

    fn fg(&self, color: Color) -> Style {
        if self.colors {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Style of an entry's rows.
    pub fn style_for_kind(&self, kind: EntryKind) -> Style {
        match kind {
            EntryKind::Log | EntryKind::Table | EntryKind::GroupEnd => Style::default(),
            EntryKind::Info => self.fg(Color::Cyan),
            EntryKind::Debug => self.fg(Color::DarkGray).add_modifier(Modifier::DIM),
            EntryKind::Warn => self.fg(Color::Yellow),
            EntryKind::Error => self.fg(Color::Red),
            EntryKind::Group | EntryKind::GroupCollapsed => {
                Style::default().add_modifier(Modifier::BOLD)
            }
            EntryKind::Trace => self.fg(Color::Magenta),
            EntryKind::Clear => Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        }
    }

    /// Style of the timestamp gutter.
    pub fn timestamp(&self) -> Style {
        self.fg(Color::DarkGray)
    }

    /// Style of the status bar.
    pub fn status_bar(&self) -> Style {
        if self.colors {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }
}

impl Default for EntryStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
