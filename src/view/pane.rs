//! The console pane: draws the rendered window and maps screen rows back to
//! entries.
//!
//! Only the entries on the overlay's surface are drawn. The first surface
//! node sits at `window.offset` content rows; each following node starts
//! where the previous one ends.

use super::constants::TIMESTAMP_WIDTH;
use super::entry::TextEntry;
use super::styles::EntryStyles;
use crate::model::{EntryId, LogEntry};
use crate::overlay::Overlay;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

/// Rendered entries with the content row each one starts at.
pub fn placed_entries(
    overlay: &Overlay<TextEntry>,
) -> impl Iterator<Item = (EntryId, usize, &TextEntry)> + '_ {
    let mut top = overlay.window().offset;
    overlay.surface().keys().iter().filter_map(move |id| {
        let entry = overlay.entry(*id)?;
        let start = top;
        top += entry.height();
        Some((*id, start, entry))
    })
}

/// Entry covering `row` rows below the top of the viewport.
pub fn entry_at(overlay: &Overlay<TextEntry>, row: usize) -> Option<EntryId> {
    let target = overlay.viewport().scroll_top + row;
    placed_entries(overlay)
        .find(|(_, start, entry)| (*start..start + entry.height()).contains(&target))
        .map(|(id, _, _)| id)
}

/// First group header with at least one row inside the viewport.
pub fn first_header_in_view(overlay: &Overlay<TextEntry>) -> Option<EntryId> {
    let viewport = overlay.viewport();
    let (lo, hi) = (
        viewport.scroll_top,
        viewport.scroll_top + viewport.client_height,
    );
    placed_entries(overlay)
        .find(|(_, start, entry)| {
            entry.is_group_header() && *start < hi && start + entry.height() > lo
        })
        .map(|(id, _, _)| id)
}

/// Widget drawing the overlay's surface.
pub struct ConsolePane<'a> {
    overlay: &'a Overlay<TextEntry>,
    styles: &'a EntryStyles,
    gutter: bool,
}

impl<'a> ConsolePane<'a> {
    /// Draw `overlay`, with a timestamp gutter if `gutter` is set.
    pub fn new(overlay: &'a Overlay<TextEntry>, styles: &'a EntryStyles, gutter: bool) -> Self {
        Self {
            overlay,
            styles,
            gutter,
        }
    }
}

impl Widget for ConsolePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll_top = self.overlay.viewport().scroll_top;
        let gutter_width = if self.gutter { TIMESTAMP_WIDTH } else { 0 };
        let text_x = area.x + gutter_width.min(area.width);
        let text_width = usize::from(area.width.saturating_sub(gutter_width));

        for (_, start, entry) in placed_entries(self.overlay) {
            let style = self.styles.style_for_kind(entry.kind());
            for (i, row) in entry.rows().iter().enumerate() {
                let Some(offset) = (start + i).checked_sub(scroll_top) else {
                    continue;
                };
                if offset >= usize::from(area.height) {
                    return;
                }
                let y = area.y + offset as u16;

                if self.gutter && i == 0 {
                    buf.set_stringn(
                        area.x,
                        y,
                        entry.timestamp_label(),
                        usize::from(gutter_width),
                        self.styles.timestamp(),
                    );
                }
                buf.set_stringn(text_x, y, row, text_width, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayOptions;
    use crate::view_state::{TolerancePolicy, Viewport};
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn overlay(client_height: usize) -> Overlay<TextEntry> {
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
        Overlay::new(options, Viewport::new(20, client_height))
    }

    fn settle(overlay: &mut Overlay<TextEntry>) {
        let start = Instant::now();
        for step in 0..4 {
            overlay.tick(start + Duration::from_millis(step));
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn hit_testing_maps_rows_to_entries() {
        let mut overlay = overlay(10);
        overlay.log(vec![json!("one")]);
        overlay.log(vec![json!("a long line that wraps")]);
        overlay.log(vec![json!("three")]);
        settle(&mut overlay);

        let ids: Vec<EntryId> = overlay.entries().map(|(id, _)| id).collect();
        assert_eq!(entry_at(&overlay, 0), Some(ids[0]));
        assert_eq!(entry_at(&overlay, 1), Some(ids[1]));
        assert_eq!(entry_at(&overlay, 2), Some(ids[1]));
        assert_eq!(entry_at(&overlay, 3), Some(ids[2]));
        assert_eq!(entry_at(&overlay, 4), None);
    }

    #[test]
    fn first_header_skips_plain_entries() {
        let mut overlay = overlay(10);
        overlay.log(vec![json!("plain")]);
        overlay.group(vec![json!("G")]);
        overlay.log(vec![json!("inside")]);
        settle(&mut overlay);

        let header = overlay.entries().nth(1).map(|(id, _)| id);
        assert_eq!(first_header_in_view(&overlay), header);
    }

    #[test]
    fn pane_draws_visible_rows_in_order() {
        let mut overlay = overlay(3);
        overlay.log(vec![json!("first")]);
        overlay.warn(vec![json!("second")]);
        settle(&mut overlay);

        let styles = EntryStyles::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ConsolePane::new(&overlay, &styles, false).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0), "first");
        assert_eq!(row_text(&buf, 1), "second");
        assert_eq!(row_text(&buf, 2), "");
    }
}
