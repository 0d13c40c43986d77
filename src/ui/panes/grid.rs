//! Column-major grid of extension toggles.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::Block,
    Frame,
};

use crate::catalog::Catalog;
use crate::ui::theme::DEFAULT_THEME;

/// Cells taken by the checkbox glyph in front of each name.
const CHECKBOX_WIDTH: usize = 3;
/// Blank cells between grid columns.
const COLUMN_SPACER: usize = 2;

/// Shows the catalog as `[X]name` cells laid out column by column and
/// tracks the highlighted entry, directional movement and the
/// incremental search anchor.
#[derive(Default)]
pub struct GridPane {
    highlighted: usize,
    search_origin: usize,
    coords: Vec<(u16, u16)>,
    area: Rect,
}

impl GridPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn height(&self) -> u16 {
        self.area.height
    }

    #[cfg(test)]
    pub(crate) fn coords(&self) -> &[(u16, u16)] {
        &self.coords
    }

    /// Recompute the column-major cell coordinates for the current
    /// viewport. Columns are as wide as the longest name plus the
    /// checkbox and spacer; each column fills top to bottom before the
    /// next one starts. When the grid cannot hold the whole catalog
    /// nothing is laid out and nothing will be drawn — a scrollable
    /// layout is a known deferral, not an accident.
    pub fn relayout(&mut self, area: Rect, catalog: &Catalog) {
        self.area = area;
        self.coords.clear();
        if catalog.is_empty() || area.height == 0 {
            return;
        }
        let col_width = catalog.longest_name() + COLUMN_SPACER + CHECKBOX_WIDTH;
        let height = area.height as usize;
        let columns = (area.width as usize / col_width).max(1);
        let capacity = (columns * height).max(1);
        if capacity < catalog.len() {
            return;
        }
        let (mut x, mut y) = (0usize, 0usize);
        for _ in 0..catalog.len() {
            self.coords.push((x as u16, y as u16));
            y += 1;
            if y >= height {
                y = 0;
                x += col_width;
            }
        }
    }

    /// Move the highlight by `dc` screen columns and `dr` rows. A
    /// column step is worth a full pane height of entries regardless of
    /// how occupied the last column is; the result is clamped into the
    /// catalog.
    pub fn move_highlight(&mut self, dc: i32, dr: i32, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        let step = i64::from(dr) + i64::from(dc) * i64::from(self.area.height);
        let next = self.highlighted as i64 + step;
        self.highlighted = next.clamp(0, catalog.len() as i64 - 1) as usize;
    }

    pub fn jump_first(&mut self) {
        self.highlighted = 0;
    }

    pub fn jump_last(&mut self, catalog: &Catalog) {
        if !catalog.is_empty() {
            self.highlighted = catalog.len() - 1;
        }
    }

    /// Jump by a quarter of the pane height in either direction,
    /// wrapping around the catalog.
    pub fn page(&mut self, dir: i32, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        let step = i64::from(self.area.height / 4) * i64::from(dir);
        let len = catalog.len() as i64;
        self.highlighted = (self.highlighted as i64 + step).rem_euclid(len) as usize;
    }

    pub fn toggle_highlighted(&mut self, catalog: &mut Catalog) {
        catalog.toggle(self.highlighted);
    }

    /// Record the current highlight as the anchor for an incremental
    /// search; repeated keystrokes refine against this position, not
    /// against wherever previous matches moved the highlight.
    pub fn begin_search(&mut self) {
        self.search_origin = self.highlighted;
    }

    /// Scan forward circularly from the entry after the anchor for the
    /// first case-insensitive substring match. No match leaves the
    /// highlight unchanged.
    pub fn advance_search(&mut self, query: &str, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        for i in 0..catalog.len() {
            let index = (self.search_origin + 1 + i) % catalog.len();
            let Some(name) = catalog.name(index) else {
                continue;
            };
            if name.to_lowercase().contains(query) {
                self.highlighted = index;
                return;
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, catalog: &Catalog) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let base = Style::default()
            .fg(DEFAULT_THEME.grid_fg)
            .bg(DEFAULT_THEME.grid_bg);
        let emphasis = Style::default()
            .fg(DEFAULT_THEME.highlight_fg)
            .bg(DEFAULT_THEME.highlight_bg);
        frame.render_widget(Block::default().style(base), self.area);

        let buf = frame.buffer_mut();
        for (index, &(x, y)) in self.coords.iter().enumerate() {
            let Some(entry) = catalog.entries().get(index) else {
                break;
            };
            let cell = format!("[{}]{}", if entry.included { 'X' } else { ' ' }, entry.name);
            let style = if index == self.highlighted {
                emphasis
            } else {
                base
            };
            let max_width = (self.area.width - x) as usize;
            buf.set_stringn(self.area.x + x, self.area.y + y, cell, max_width, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn sized(width: u16, height: u16, cat: &Catalog) -> GridPane {
        let mut pane = GridPane::new();
        pane.relayout(Rect::new(0, 0, width, height), cat);
        pane
    }

    #[test]
    fn layout_fills_columns_top_to_bottom() {
        let cat = catalog(&["aa", "bb", "cc", "dd", "ee"]);
        // col width = 2 + 2 + 3 = 7; two columns fit in 15 cells
        let pane = sized(15, 3, &cat);
        assert_eq!(
            pane.coords(),
            &[(0, 0), (0, 1), (0, 2), (7, 0), (7, 1)]
        );
    }

    #[test]
    fn overflowing_catalog_is_not_laid_out() {
        let cat = catalog(&["aa", "bb", "cc", "dd", "ee"]);
        // one 7-wide column of height 3 holds only 3 of 5 entries
        let pane = sized(10, 3, &cat);
        assert!(pane.coords().is_empty());
    }

    #[test]
    fn names_wider_than_the_pane_still_get_one_column() {
        let cat = catalog(&["very_long_extension_name"]);
        let pane = sized(10, 2, &cat);
        assert_eq!(pane.coords(), &[(0, 0)]);
    }

    #[test]
    fn move_highlight_clamps_to_catalog() {
        let cat = catalog(&["a", "b", "c", "d", "e"]);
        let mut pane = sized(40, 3, &cat);

        pane.move_highlight(0, -1, &cat);
        assert_eq!(pane.highlighted(), 0);

        pane.move_highlight(0, 1, &cat);
        assert_eq!(pane.highlighted(), 1);

        // one column right = one pane height of rows
        pane.move_highlight(1, 0, &cat);
        assert_eq!(pane.highlighted(), 4);

        pane.move_highlight(1, 0, &cat);
        assert_eq!(pane.highlighted(), 4);
    }

    #[test]
    fn movement_on_empty_catalog_is_noop() {
        let cat = catalog(&[]);
        let mut pane = sized(40, 5, &cat);
        pane.move_highlight(1, 1, &cat);
        pane.page(1, &cat);
        pane.jump_last(&cat);
        pane.advance_search("x", &cat);
        assert_eq!(pane.highlighted(), 0);
    }

    #[test]
    fn page_moves_a_quarter_height_and_wraps() {
        let names: Vec<String> = (0..10).map(|i| format!("ext{i}")).collect();
        let cat = Catalog::new(names);
        let mut pane = GridPane::new();
        pane.relayout(Rect::new(0, 0, 200, 8), &cat);

        pane.page(1, &cat);
        assert_eq!(pane.highlighted(), 2);

        for _ in 0..4 {
            pane.page(1, &cat);
        }
        assert_eq!(pane.highlighted(), 0);

        pane.page(-1, &cat);
        assert_eq!(pane.highlighted(), 8);
    }

    #[test]
    fn search_wraps_circularly_from_the_anchor() {
        let cat = catalog(&["alpha", "beta", "gamma"]);
        let mut pane = sized(80, 3, &cat);
        pane.jump_last(&cat);
        pane.begin_search();
        pane.advance_search("al", &cat);
        assert_eq!(pane.highlighted(), 0);
    }

    #[test]
    fn search_refines_against_a_stable_anchor() {
        let cat = catalog(&["pg_cron", "pg_prewarm", "pg_stat_statements"]);
        let mut pane = sized(200, 3, &cat);
        pane.begin_search();
        pane.advance_search("pg_", &cat);
        assert_eq!(pane.highlighted(), 1);
        // longer query rescans from the anchor, not from the last match
        pane.advance_search("pg_s", &cat);
        assert_eq!(pane.highlighted(), 2);
    }

    #[test]
    fn search_without_match_keeps_the_highlight() {
        let cat = catalog(&["alpha", "beta"]);
        let mut pane = sized(80, 2, &cat);
        pane.move_highlight(0, 1, &cat);
        pane.begin_search();
        pane.advance_search("zzz", &cat);
        assert_eq!(pane.highlighted(), 1);
    }

    #[test]
    fn search_is_case_insensitive_over_names() {
        let cat = catalog(&["Alpha_Ext", "other"]);
        let mut pane = sized(80, 2, &cat);
        pane.move_highlight(0, 1, &cat);
        pane.begin_search();
        pane.advance_search("alpha", &cat);
        assert_eq!(pane.highlighted(), 0);
    }

    #[test]
    fn toggle_flips_the_highlighted_entry() {
        let mut cat = catalog(&["a", "b"]);
        let mut pane = sized(40, 2, &cat);
        pane.move_highlight(0, 1, &cat);
        pane.toggle_highlighted(&mut cat);
        assert!(!cat.entries()[0].included);
        assert!(cat.entries()[1].included);
    }
}
