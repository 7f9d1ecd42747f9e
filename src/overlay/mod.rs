//! Overlay controller: owns the console engine and drives it from host ticks.
//!
//! ```text
//! producer call -> IngestionQueue -> ConsoleState (log store + groups)
//!                                          |
//!               host tick -> group filter -> measure -> windower -> reconcile -> surface
//! ```
//!
//! All mutation happens inside [`Overlay::tick`] on the host's thread:
//! queued producer calls are drained in chunks, entry notifications are
//! applied, and a throttled render brings the surface in line with the
//! current window.

mod console;
mod state;

pub use state::ConsoleState;

use crate::config::ResolvedConfig;
use crate::model::{EntryEvent, EntryId, GroupId, LogEntry};
use crate::state::{DrainReport, GroupStateMachine, IngestionQueue, Throttle, DEFAULT_CHUNK_SIZE};
use crate::view_state::{
    compute_window, reconcile, HeightIndex, ListSurface, ReconcileStats, RenderSurface,
    ScrollTracker, Tolerance, TolerancePolicy, Viewport, Window,
};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    /// Queued tasks executed per drain.
    pub chunk_size: usize,
    /// Delay between the first enqueue of an idle period and the drain.
    pub debounce: Duration,
    /// Minimum interval between renders.
    pub throttle: Duration,
    /// Prefetch tolerance tuning.
    pub tolerance: TolerancePolicy,
    /// Auto-follow scrolls to `total_height * bottom_overshoot`.
    pub bottom_overshoot: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            debounce: Duration::ZERO,
            throttle: Duration::from_millis(16),
            tolerance: TolerancePolicy::default(),
            bottom_overshoot: 1.5,
        }
    }
}

impl From<&ResolvedConfig> for OverlayOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            debounce: Duration::from_millis(config.debounce_ms),
            throttle: Duration::from_millis(config.throttle_ms),
            tolerance: TolerancePolicy {
                min: config.min_tolerance,
                max: config.max_tolerance,
                stalled: config.stalled_tolerance,
                stall_threshold: Duration::from_millis(config.stall_threshold_ms),
                velocity_factor: config.velocity_factor,
                default_margin: config.default_tolerance,
            },
            bottom_overshoot: f64::from(config.bottom_overshoot_percent) / 100.0,
        }
    }
}

/// What one [`Overlay::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Set if a queue drain ran.
    pub drained: Option<DrainReport>,
    /// Set if a render ran and touched the surface.
    pub rendered: Option<ReconcileStats>,
}

/// Entries staged for measurement at the current width.
///
/// Filled, measured and emptied within a single render, so staged entries
/// never reach the visible surface in an unmeasured state.
#[derive(Debug, Default)]
struct MeasurementArea {
    staged: Vec<EntryId>,
}

impl MeasurementArea {
    fn measure<E: LogEntry>(&mut self, state: &mut ConsoleState<E>, ids: &[EntryId], width: u16) {
        self.staged.extend(ids.iter().copied().filter(|id| {
            state
                .logs
                .get(*id)
                .is_some_and(|entry| entry.needs_measure(width))
        }));
        if self.staged.is_empty() {
            return;
        }

        for id in &self.staged {
            if let Some(entry) = state.logs.get_mut(*id) {
                entry.update_size(width);
            }
        }
        trace!(measured = self.staged.len(), width, "Measured entries");
        self.staged.clear();
    }
}

/// One console overlay.
///
/// Independent of any other overlay: each instance owns its queue, log
/// history, group state, counters, timers and surface.
pub struct Overlay<E, S = ListSurface<EntryId>>
where
    E: LogEntry + 'static,
    S: RenderSurface<Key = EntryId>,
{
    queue: IngestionQueue<ConsoleState<E>>,
    state: ConsoleState<E>,
    events: Receiver<EntryEvent>,
    tracker: ScrollTracker,
    render_schedule: Throttle<Tolerance>,
    viewport: Viewport,
    window: Window,
    heights: HeightIndex,
    visible: Vec<EntryId>,
    measurement: MeasurementArea,
    hidden: bool,
    surface: S,
    bottom_overshoot: f64,
    /// Clock of the most recent tick; producer calls are scheduled from it.
    now: Instant,
}

impl<E: LogEntry + 'static> Overlay<E> {
    /// Create an overlay rendering into a [`ListSurface`].
    pub fn new(options: OverlayOptions, viewport: Viewport) -> Self {
        Self::with_surface(options, viewport, ListSurface::new())
    }
}

impl<E, S> Overlay<E, S>
where
    E: LogEntry + 'static,
    S: RenderSurface<Key = EntryId>,
{
    /// Create an overlay rendering into `surface`.
    pub fn with_surface(options: OverlayOptions, viewport: Viewport, surface: S) -> Self {
        let now = Instant::now();
        let (tx, rx) = mpsc::channel();
        Self {
            queue: IngestionQueue::new(options.chunk_size, options.debounce),
            state: ConsoleState::new(tx, now),
            events: rx,
            tracker: ScrollTracker::new(options.tolerance),
            render_schedule: Throttle::new(options.throttle),
            viewport,
            window: Window::default(),
            heights: HeightIndex::new(0),
            visible: Vec::new(),
            measurement: MeasurementArea::default(),
            hidden: false,
            surface,
            bottom_overshoot: options.bottom_overshoot,
            now,
        }
    }

    /// Advance the engine to `now`.
    ///
    /// Applies pending entry notifications, runs the queue drain if it is
    /// due, then runs the render if the throttle allows it.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        self.now = now;
        self.process_events();

        self.state.now = now;
        let drained = self.queue.poll(&mut self.state, now);
        if std::mem::take(&mut self.state.cleared) {
            self.tracker.reset();
        }
        self.flush_render_request();

        let rendered = self
            .render_schedule
            .poll(now)
            .and_then(|tolerance| self.render(tolerance, now));

        TickOutcome { drained, rendered }
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EntryEvent::Resized(id) => {
                    trace!(entry = %id, "Entry resized");
                    self.state.render_requested = true;
                }
                EntryEvent::Toggled { entry, collapsed } => {
                    if !self.state.toggle(entry, collapsed) {
                        debug!(entry = %entry, "Ignoring toggle from unknown group header");
                    }
                }
            }
        }
    }

    fn flush_render_request(&mut self) {
        if std::mem::take(&mut self.state.render_requested) {
            self.render_schedule
                .request(self.tracker.policy().default_tolerance(), self.now);
        }
    }

    /// Recompute the window and bring the surface in line with it.
    ///
    /// Returns `None` while the overlay is hidden.
    fn render(&mut self, tolerance: Tolerance, now: Instant) -> Option<ReconcileStats> {
        if self.hidden {
            return None;
        }

        let state = &mut self.state;
        self.visible.clear();
        self.visible.extend(
            state
                .logs
                .iter()
                .filter(|(_, entry)| state.groups.is_visible(entry.group_stack()))
                .map(|(id, _)| id),
        );

        let width = self.viewport.width;
        self.measurement.measure(state, &self.visible, width);

        self.heights.clear();
        for id in &self.visible {
            self.heights
                .push(state.logs.get(*id).map_or(0, |entry| entry.height()));
        }

        let was_at_bottom = self.viewport.is_at_bottom(self.window.total_height);
        // Collapse or clear can shrink the content below the scroll offset.
        self.viewport
            .scroll_to(self.viewport.scroll_top, self.heights.total());
        self.window = compute_window(&self.heights, &self.viewport, tolerance);
        let keys = &self.visible[self.window.range.indices()];
        let stats = reconcile(&mut self.surface, keys);

        debug!(
            visible = self.visible.len(),
            start = self.window.range.start,
            end = self.window.range.end,
            total_height = self.window.total_height,
            inserted = stats.inserted,
            moved = stats.moved,
            removed = stats.removed,
            "Rendered window"
        );

        if was_at_bottom {
            self.follow_bottom(now);
        }
        Some(stats)
    }

    /// Scroll past the end so content appended later stays in view.
    fn follow_bottom(&mut self, now: Instant) {
        let total = self.window.total_height;
        let target = (total as f64 * self.bottom_overshoot).ceil() as usize;
        let before = self.viewport.scroll_top;
        self.viewport.scroll_to(target, total);
        if self.viewport.scroll_top != before {
            // A programmatic scroll behaves like a user one.
            self.on_scroll(self.viewport.scroll_top, now);
        }
    }

    /// Host scroll notification.
    pub fn on_scroll(&mut self, scroll_top: usize, now: Instant) {
        self.viewport.scroll_top = scroll_top;
        let tolerance = self.tracker.on_scroll(scroll_top, now);
        self.render_schedule.request(tolerance, now);
    }

    /// Scroll by a signed number of rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: isize, now: Instant) {
        let total = self.window.total_height;
        let target = self.viewport.scroll_top.saturating_add_signed(delta);
        let target = target.min(self.viewport.max_scroll(total));
        if target != self.viewport.scroll_top {
            self.on_scroll(target, now);
        }
    }

    /// Host resize notification. A width change re-measures every entry.
    pub fn on_resize(&mut self, width: u16, client_height: usize) {
        self.viewport.width = width;
        self.viewport.client_height = client_height;
        let total = self.window.total_height;
        self.viewport.scroll_to(self.viewport.scroll_top, total);
        self.render_schedule
            .request(self.tracker.policy().default_tolerance(), self.now);
    }

    /// Show or hide the overlay. Renders are skipped while hidden.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        if !hidden {
            self.render_schedule
                .request(self.tracker.policy().default_tolerance(), self.now);
        }
    }

    /// Whether the overlay is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Earliest instant at which a tick has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.queue.deadline(), self.render_schedule.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Producer calls waiting in the queue.
    pub fn pending_calls(&self) -> usize {
        self.queue.len()
    }

    /// Look up an entry.
    pub fn entry(&self, id: EntryId) -> Option<&E> {
        self.state.logs.get(id)
    }

    /// Look up an entry mutably, e.g. to toggle a group header.
    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut E> {
        self.state.logs.get_mut(id)
    }

    /// All entries in attach order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &E)> {
        self.state.logs.iter()
    }

    /// Number of entries in the log history.
    pub fn len(&self) -> usize {
        self.state.logs.len()
    }

    /// Whether the log history is empty.
    pub fn is_empty(&self) -> bool {
        self.state.logs.is_empty()
    }

    /// Group-filtered entries as of the last render.
    pub fn visible_entries(&self) -> &[EntryId] {
        &self.visible
    }

    /// Whether the entry passes the group filter right now.
    pub fn is_visible(&self, id: EntryId) -> bool {
        self.state
            .logs
            .get(id)
            .is_some_and(|entry| self.state.groups.is_visible(entry.group_stack()))
    }

    /// Group opened by a group header entry.
    pub fn group_of(&self, header: EntryId) -> Option<GroupId> {
        self.state.headers.get(&header).copied()
    }

    /// Group scopes and collapse state.
    pub fn groups(&self) -> &GroupStateMachine {
        &self.state.groups
    }

    /// Current value of a counter.
    pub fn counter(&self, label: &str) -> Option<u64> {
        self.state.counters.get(label).copied()
    }

    /// Whether a timer with this label is running.
    pub fn has_timer(&self, label: &str) -> bool {
        self.state.timers.contains_key(label)
    }

    /// Window as of the last render.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Host viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Rendered surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
