//! Core view-state value types

/// Prefetch margins around the viewport, in surface rows.
///
/// Asymmetric: the direction of travel gets the larger margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    /// Rows rendered above the viewport.
    pub top: usize,
    /// Rows rendered below the viewport.
    pub bottom: usize,
}

impl Tolerance {
    /// Create a tolerance pair.
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    /// Same margin on both sides.
    pub fn symmetric(margin: usize) -> Self {
        Self::new(margin, margin)
    }

    /// No prefetch at all.
    pub const ZERO: Self = Self { top: 0, bottom: 0 };
}

/// The scrollable container as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Offset of the top visible row from the top of the content.
    pub scroll_top: usize,
    /// Visible rows.
    pub client_height: usize,
    /// Columns available to entries; entries are measured at this width.
    pub width: u16,
}

impl Viewport {
    /// Create a viewport scrolled to the top.
    pub fn new(width: u16, client_height: usize) -> Self {
        Self {
            scroll_top: 0,
            client_height,
            width,
        }
    }

    /// Largest valid scroll offset for content of `content_height` rows.
    pub fn max_scroll(&self, content_height: usize) -> usize {
        content_height.saturating_sub(self.client_height)
    }

    /// Scroll to `offset`, clamped to the content like a real container.
    pub fn scroll_to(&mut self, offset: usize, content_height: usize) {
        self.scroll_top = offset.min(self.max_scroll(content_height));
    }

    /// Whether the viewport shows the end of the content.
    ///
    /// True within one row of the bottom, or when everything fits.
    pub fn is_at_bottom(&self, content_height: usize) -> bool {
        let remaining = content_height as i64 - self.scroll_top as i64 - self.client_height as i64;
        remaining.abs() < 1 || content_height <= self.client_height
    }
}
