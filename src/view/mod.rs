//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod entry;
pub mod format;
mod pane;
mod status;
mod styles;

pub use entry::TextEntry;
pub use pane::{entry_at, first_header_in_view, placed_entries, ConsolePane};
pub use status::{status_line, StatusInfo};
pub use styles::{ColorConfig, EntryStyles};

use crate::config::keybindings::KeyBindings;
use crate::model::KeyAction;
use crate::overlay::{Overlay, OverlayOptions, TickOutcome};
use crate::source::InputSource;
use crate::view_state::Viewport;
use constants::{
    IDLE_POLL_INTERVAL_MS, MIN_WIDTH_FOR_TIMESTAMPS, STATUS_BAR_HEIGHT, TIMESTAMP_WIDTH,
};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] crate::model::InputError),
}

/// Split the frame into the console pane and the status bar.
fn split_frame(area: Rect) -> (Rect, Rect) {
    let status_height = STATUS_BAR_HEIGHT.min(area.height);
    let pane = Rect::new(area.x, area.y, area.width, area.height - status_height);
    let status = Rect::new(area.x, area.y + pane.height, area.width, status_height);
    (pane, status)
}

/// Whether a pane this wide shows the timestamp gutter.
fn shows_gutter(width: u16) -> bool {
    width >= MIN_WIDTH_FOR_TIMESTAMPS
}

/// Viewport the overlay measures against for a pane.
fn viewport_for(pane: Rect) -> Viewport {
    let gutter = if shows_gutter(pane.width) {
        TIMESTAMP_WIDTH
    } else {
        0
    };
    Viewport::new(
        pane.width.saturating_sub(gutter).max(1),
        usize::from(pane.height),
    )
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    overlay: Overlay<TextEntry>,
    input_source: InputSource,
    key_bindings: KeyBindings,
    styles: EntryStyles,
    /// Last rendered pane area (for click hit testing)
    last_pane_area: Rect,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        input_source: InputSource,
        options: OverlayOptions,
        colors: ColorConfig,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self::with_terminal(
            terminal,
            input_source,
            options,
            EntryStyles::with_color_config(colors),
        ))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Sleeps until the next overlay
    /// deadline, a terminal event, or the idle poll interval.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let idle = Duration::from_millis(IDLE_POLL_INTERVAL_MS);

        self.pump(Instant::now())?;
        self.draw()?;

        loop {
            let now = Instant::now();
            let timeout = self
                .overlay
                .next_deadline()
                .map_or(idle, |deadline| {
                    deadline.saturating_duration_since(now).min(idle)
                });

            let mut dirty = false;
            if event::poll(timeout)? {
                let now = Instant::now();
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, now) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse, now);
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        dirty = true;
                    }
                    _ => {}
                }
            }

            let outcome = self.pump(Instant::now())?;
            if dirty || outcome.drained.is_some() || outcome.rendered.is_some() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app around an existing terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        input_source: InputSource,
        options: OverlayOptions,
        styles: EntryStyles,
    ) -> Self {
        // Zero-sized terminals report an error or 0x0; fall back to 80x24.
        let size = match terminal.size() {
            Ok(size) if size.width > 0 && size.height > 0 => size,
            _ => ratatui::layout::Size::new(80, 24),
        };
        let (pane, _) = split_frame(Rect::new(0, 0, size.width, size.height));

        Self {
            terminal,
            overlay: Overlay::new(options, viewport_for(pane)),
            input_source,
            key_bindings: KeyBindings::default(),
            styles,
            last_pane_area: pane,
        }
    }

    /// The console engine.
    pub fn overlay(&self) -> &Overlay<TextEntry> {
        &self.overlay
    }

    /// Terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Feed new input calls into the overlay and advance it to `now`.
    pub fn pump(&mut self, now: Instant) -> Result<TickOutcome, TuiError> {
        let calls = self.input_source.poll()?;
        if !calls.is_empty() {
            debug!(calls = calls.len(), "Dispatching console calls");
        }
        for call in calls {
            self.overlay.dispatch(call);
        }
        Ok(self.overlay.tick(now))
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        // Ctrl+C always quits, even if not in bindings
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        let page = self.overlay.viewport().client_height.max(1) as isize;
        match action {
            KeyAction::ScrollUp => self.overlay.scroll_by(-1, now),
            KeyAction::ScrollDown => self.overlay.scroll_by(1, now),
            KeyAction::PageUp => self.overlay.scroll_by(-page, now),
            KeyAction::PageDown => self.overlay.scroll_by(page, now),
            KeyAction::ScrollToTop => self.overlay.on_scroll(0, now),
            KeyAction::ScrollToBottom => {
                let total = self.overlay.window().total_height;
                let bottom = self.overlay.viewport().max_scroll(total);
                self.overlay.on_scroll(bottom, now);
            }
            KeyAction::ToggleGroup => {
                if let Some(header) = first_header_in_view(&self.overlay) {
                    self.toggle_header(header);
                }
            }
            KeyAction::Clear => self.overlay.clear(),
            KeyAction::ToggleHidden => {
                let hidden = !self.overlay.is_hidden();
                self.overlay.set_hidden(hidden);
            }
            KeyAction::Quit => return true,
        }
        false
    }

    fn toggle_header(&mut self, header: crate::model::EntryId) {
        if let Some(entry) = self.overlay.entry_mut(header) {
            entry.toggle();
        }
    }

    /// Handle a single mouse event: wheel scrolls, left click toggles a
    /// group header under the cursor.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.overlay.scroll_by(-WHEEL_STEP, now),
            MouseEventKind::ScrollDown => self.overlay.scroll_by(WHEEL_STEP, now),
            MouseEventKind::Down(MouseButton::Left) => {
                let area = self.last_pane_area;
                let inside = mouse.column >= area.x
                    && mouse.column < area.x + area.width
                    && mouse.row >= area.y
                    && mouse.row < area.y + area.height;
                if !inside || self.overlay.is_hidden() {
                    return;
                }
                let row = usize::from(mouse.row - area.y);
                if let Some(id) = entry_at(&self.overlay, row) {
                    if self
                        .overlay
                        .entry(id)
                        .is_some_and(|entry| entry.is_group_header())
                    {
                        self.toggle_header(id);
                    }
                }
            }
            _ => {}
        }
    }

    /// Terminal resized: re-measure at the new width.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "Handling resize");
        let (pane, _) = split_frame(Rect::new(0, 0, width.max(1), height));
        let viewport = viewport_for(pane);
        self.last_pane_area = pane;
        self.overlay
            .on_resize(viewport.width, viewport.client_height);
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let overlay = &self.overlay;
        let styles = &self.styles;
        let info = StatusInfo {
            entries: overlay.len(),
            visible: overlay.visible_entries().len(),
            pending: overlay.pending_calls(),
            live: self.input_source.is_live(),
            hidden: overlay.is_hidden(),
        };

        let mut pane_area = self.last_pane_area;
        self.terminal.draw(|frame| {
            let (pane, status) = split_frame(frame.area());
            pane_area = pane;

            if overlay.is_hidden() {
                frame.render_widget(
                    Paragraph::new("console hidden, press h to show")
                        .alignment(Alignment::Center),
                    pane,
                );
            } else {
                frame.render_widget(
                    ConsolePane::new(overlay, styles, shows_gutter(pane.width)),
                    pane,
                );
            }
            frame.render_widget(
                Paragraph::new(status_line(info)).style(styles.status_bar()),
                status,
            );
        })?;
        self.last_pane_area = pane_area;

        Ok(())
    }
}

/// Initialize and run the TUI application with an input source.
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// on exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source(
    input_source: InputSource,
    options: OverlayOptions,
    colors: ColorConfig,
) -> Result<(), TuiError> {
    info!(live = input_source.is_live(), "Starting console viewer");
    let mut app = TuiApp::new(input_source, options, colors)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
