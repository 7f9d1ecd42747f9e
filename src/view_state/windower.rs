//! Viewport windowing: which entries to render for the current scroll state.
//!
//! Only entries whose row interval intersects
//! `[scroll_top - tolerance.top, scroll_top + client_height + tolerance.bottom]`
//! are rendered. Tolerances adapt to scroll velocity so fast scrolling
//! prefetches further ahead in the direction of travel.

use super::height_index::HeightIndex;
use super::types::{Tolerance, Viewport};
use super::visible_range::VisibleRange;
use std::time::{Duration, Instant};

/// Velocity-to-tolerance tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct TolerancePolicy {
    /// Floor, and the margin kept opposite to the direction of travel.
    pub min: usize,
    /// Cap for fast scrolling.
    pub max: usize,
    /// Margin used when the previous sample is too old to extrapolate from.
    pub stalled: usize,
    /// Sample gap beyond which scrolling counts as stalled.
    pub stall_threshold: Duration,
    /// Rows of tolerance per (row/ms) of scroll speed.
    pub velocity_factor: f64,
    /// Symmetric margin for renders not triggered by scrolling.
    pub default_margin: usize,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            min: 600,
            max: 2000,
            stalled: 1200,
            stall_threshold: Duration::from_millis(200),
            velocity_factor: 100.0,
            default_margin: 800,
        }
    }
}

impl TolerancePolicy {
    /// Tolerance for renders not caused by a scroll event.
    pub fn default_tolerance(&self) -> Tolerance {
        Tolerance::symmetric(self.default_margin)
    }
}

/// Tracks successive scroll samples to derive prefetch tolerance.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    policy: TolerancePolicy,
    last_scroll_top: usize,
    last_time: Option<Instant>,
}

impl ScrollTracker {
    /// Create a tracker with no prior sample.
    pub fn new(policy: TolerancePolicy) -> Self {
        Self {
            policy,
            last_scroll_top: 0,
            last_time: None,
        }
    }

    /// Tuning in effect.
    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }

    /// Record a scroll sample and return the tolerance to render with.
    pub fn on_scroll(&mut self, scroll_top: usize, now: Instant) -> Tolerance {
        let distance = scroll_top.abs_diff(self.last_scroll_top) as f64;
        let policy = &self.policy;

        let adaptive = match self.last_time.map(|t| now.duration_since(t)) {
            Some(delta) if delta <= policy.stall_threshold => {
                let elapsed_ms = delta.as_micros() as f64 / 1000.0;
                if elapsed_ms > 0.0 {
                    let speed = distance / elapsed_ms;
                    (speed * policy.velocity_factor).min(policy.max as f64) as usize
                } else if distance > 0.0 {
                    policy.max
                } else {
                    policy.min
                }
            }
            _ => policy.stalled,
        };
        let tolerance = adaptive.clamp(policy.min, policy.max.max(policy.min));

        let result = if scroll_top < self.last_scroll_top {
            Tolerance::new(tolerance, policy.min)
        } else {
            Tolerance::new(policy.min, tolerance)
        };

        self.last_scroll_top = scroll_top;
        self.last_time = Some(now);
        result
    }

    /// Forget the previous sample (next scroll is treated as stalled).
    pub fn reset(&mut self) {
        self.last_scroll_top = 0;
        self.last_time = None;
    }
}

/// Layout of the rendered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Sum of all visible entry heights (the scrollable extent).
    pub total_height: usize,
    /// Offset of the first rendered entry from the top of the content.
    pub offset: usize,
    /// Entries to render.
    pub range: VisibleRange,
}

/// Compute the window for `viewport` over entries with the given heights.
///
/// Entry `i` spans `[before_i, before_i + h_i]`. It is rendered iff
/// `before_i + h_i >= scroll_top - top` and
/// `before_i <= scroll_top + client_height + bottom`; since heights
/// accumulate monotonically the result is contiguous.
pub fn compute_window(index: &HeightIndex, viewport: &Viewport, tolerance: Tolerance) -> Window {
    let total_height = index.total();
    if index.is_empty() {
        return Window::default();
    }

    let lo = viewport.scroll_top.saturating_sub(tolerance.top);
    let hi = viewport
        .scroll_top
        .saturating_add(viewport.client_height)
        .saturating_add(tolerance.bottom);

    // First entry whose end reaches `lo`.
    let start = if lo == 0 {
        Some(0)
    } else {
        index.lower_bound(lo - 1)
    };
    let Some(start) = start else {
        return Window {
            total_height,
            offset: 0,
            range: VisibleRange::empty(),
        };
    };

    // One past the last entry starting at or before `hi`.
    let end = index.lower_bound(hi).map_or(index.len(), |j| j + 1);

    Window {
        total_height,
        offset: index.offset_of(start),
        range: VisibleRange::new(start, end.max(start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport(scroll_top: usize, client_height: usize) -> Viewport {
        Viewport {
            scroll_top,
            client_height,
            width: 80,
        }
    }

    /// Straight accumulate-and-test scan the binary searches must agree with.
    fn linear_window(heights: &[usize], vp: &Viewport, tol: Tolerance) -> Window {
        let lo = vp.scroll_top.saturating_sub(tol.top);
        let hi = vp.scroll_top + vp.client_height + tol.bottom;
        let mut acc = 0;
        let mut first = None;
        let mut last = None;
        let mut offset = 0;
        for (i, &h) in heights.iter().enumerate() {
            let before = acc;
            acc += h;
            if acc >= lo && before <= hi {
                if first.is_none() {
                    first = Some(i);
                    offset = before;
                }
                last = Some(i);
            }
        }
        Window {
            total_height: acc,
            offset,
            range: match (first, last) {
                (Some(s), Some(e)) => VisibleRange::new(s, e + 1),
                _ => VisibleRange::empty(),
            },
        }
    }

    mod compute {
        use super::*;

        #[test]
        fn empty_index_yields_empty_window() {
            let window = compute_window(&HeightIndex::new(0), &viewport(0, 10), Tolerance::ZERO);
            assert_eq!(window, Window::default());
        }

        #[test]
        fn top_of_content_without_tolerance() {
            let index = HeightIndex::from_heights([2; 10]);
            let window = compute_window(&index, &viewport(0, 5), Tolerance::ZERO);
            assert_eq!(window.total_height, 20);
            assert_eq!(window.offset, 0);
            // Rows 0..=5 touch entries 0, 1, 2 (entry 2 starts at row 4)
            assert_eq!(window.range, VisibleRange::new(0, 3));
        }

        #[test]
        fn middle_of_content_reports_offset_of_first_entry() {
            let index = HeightIndex::from_heights([2; 10]);
            let window = compute_window(&index, &viewport(7, 4), Tolerance::ZERO);
            // Entry 3 spans [6, 8], entry 5 spans [10, 12]
            assert_eq!(window.range, VisibleRange::new(3, 6));
            assert_eq!(window.offset, 6);
        }

        #[test]
        fn tolerance_extends_both_sides() {
            let index = HeightIndex::from_heights([1; 100]);
            let window = compute_window(&index, &viewport(50, 10), Tolerance::new(5, 20));
            assert_eq!(window.range.start, 44);
            assert_eq!(window.range.last(), Some(80));
        }

        #[test]
        fn scrolled_past_content_is_empty() {
            let index = HeightIndex::from_heights([1; 5]);
            let window = compute_window(&index, &viewport(100, 10), Tolerance::ZERO);
            assert!(window.range.is_empty());
            assert_eq!(window.total_height, 5);
        }

        #[test]
        fn unmeasured_entries_do_not_break_range() {
            let index = HeightIndex::from_heights([0, 0, 3, 0, 3]);
            let window = compute_window(&index, &viewport(0, 2), Tolerance::ZERO);
            assert_eq!(window.range.start, 0);
        }
    }

    mod tracker {
        use super::*;

        #[test]
        fn first_scroll_uses_stalled_tolerance_downwards() {
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            let tol = tracker.on_scroll(100, Instant::now());
            assert_eq!(tol, Tolerance::new(600, 1200));
        }

        #[test]
        fn slow_scroll_is_floored_at_minimum() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(0, t0);
            let tol = tracker.on_scroll(1, t0 + Duration::from_millis(100));
            assert_eq!(tol, Tolerance::new(600, 600));
        }

        #[test]
        fn fast_scroll_is_capped_at_maximum() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(0, t0);
            let tol = tracker.on_scroll(5_000, t0 + Duration::from_millis(10));
            assert_eq!(tol, Tolerance::new(600, 2000));
        }

        #[test]
        fn medium_speed_scales_linearly() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(0, t0);
            // 150 rows in 10ms = 15 rows/ms -> 1500
            let tol = tracker.on_scroll(150, t0 + Duration::from_millis(10));
            assert_eq!(tol, Tolerance::new(600, 1500));
        }

        #[test]
        fn upward_scroll_biases_top() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(1_000, t0);
            let tol = tracker.on_scroll(850, t0 + Duration::from_millis(10));
            assert_eq!(tol, Tolerance::new(1500, 600));
        }

        #[test]
        fn gap_longer_than_threshold_snaps_to_stalled() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(0, t0);
            let tol = tracker.on_scroll(5_000, t0 + Duration::from_millis(201));
            assert_eq!(tol, Tolerance::new(600, 1200));
        }

        #[test]
        fn same_instant_samples_do_not_divide_by_zero() {
            let t0 = Instant::now();
            let mut tracker = ScrollTracker::new(TolerancePolicy::default());
            tracker.on_scroll(0, t0);
            assert_eq!(tracker.on_scroll(0, t0), Tolerance::new(600, 600));
            assert_eq!(tracker.on_scroll(10, t0), Tolerance::new(600, 2000));
        }
    }

    proptest! {
        #[test]
        fn prop_matches_linear_scan(
            heights in prop::collection::vec(0usize..=6, 0..60),
            scroll_top in 0usize..200,
            client_height in 0usize..40,
            top in 0usize..30,
            bottom in 0usize..30,
        ) {
            let index = HeightIndex::from_heights(heights.iter().copied());
            let vp = viewport(scroll_top, client_height);
            let tol = Tolerance::new(top, bottom);
            prop_assert_eq!(compute_window(&index, &vp, tol), linear_window(&heights, &vp, tol));
        }

        #[test]
        fn prop_range_covers_viewport(
            heights in prop::collection::vec(1usize..=6, 1..60),
            scroll_top in 0usize..200,
            client_height in 1usize..40,
        ) {
            let index = HeightIndex::from_heights(heights.iter().copied());
            let vp = viewport(scroll_top, client_height);
            let window = compute_window(&index, &vp, Tolerance::ZERO);

            if scroll_top < window.total_height {
                prop_assert!(!window.range.is_empty());
                prop_assert!(window.offset <= scroll_top);
                let rendered_end = index.offset_of(window.range.end);
                let viewport_end = (scroll_top + client_height).min(window.total_height);
                prop_assert!(rendered_end >= viewport_end);
            }
        }
    }
}
