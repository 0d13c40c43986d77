//! The three preload field lines and the active-field marker.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::catalog::{Catalog, PreloadFields, FIELD_COUNT, FIELD_KEYS};
use crate::ui::theme::DEFAULT_THEME;

/// Marker in front of the line receiving toggle edits.
const ACTIVE_MARKER: &str = "==> ";
const IDLE_MARKER: &str = "    ";

/// Shows the three field values, one per line, and tracks which of them
/// is active. All toggle edits land in the active field, and the
/// catalog's inclusion flags always mirror the active field's tokens.
pub struct FieldsPane {
    fields: PreloadFields,
    active: usize,
    area: Rect,
}

impl FieldsPane {
    pub fn new(fields: PreloadFields) -> Self {
        Self {
            fields,
            active: 0,
            area: Rect::default(),
        }
    }

    pub fn fields(&self) -> &PreloadFields {
        &self.fields
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Make `index` (wrapping) the active field and re-derive every
    /// catalog flag from its token list.
    pub fn set_active(&mut self, index: usize, catalog: &mut Catalog) {
        self.active = index % FIELD_COUNT;
        catalog.sync_to_value(self.fields.get(self.active));
    }

    pub fn cycle_active(&mut self, catalog: &mut Catalog) {
        self.set_active(self.active + 1, catalog);
    }

    /// Apply the (already flipped) inclusion flag of catalog entry
    /// `index` to the active field: append the name when it is now
    /// included, otherwise rebuild the list without it.
    pub fn toggle_token(&mut self, index: usize, catalog: &Catalog) {
        let Some(entry) = catalog.entries().get(index) else {
            return;
        };
        if entry.included {
            self.fields.append_token(self.active, &entry.name);
        } else {
            self.fields.remove_token(self.active, &entry.name);
        }
    }

    /// Clear all three fields and every inclusion flag.
    pub fn reset(&mut self, catalog: &mut Catalog) {
        self.fields.clear_all();
        catalog.clear_flags();
    }

    pub fn relayout(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn render(&self, frame: &mut Frame) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let key_width = FIELD_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
        let lines: Vec<Line> = (0..FIELD_COUNT)
            .map(|slot| {
                let marker = if slot == self.active {
                    ACTIVE_MARKER
                } else {
                    IDLE_MARKER
                };
                Line::from(format!(
                    "{marker}{key:<key_width$} = '{value}'",
                    key = FIELD_KEYS[slot],
                    value = self.fields.get(slot),
                ))
            })
            .collect();
        let style = Style::default()
            .fg(DEFAULT_THEME.field_fg)
            .bg(DEFAULT_THEME.field_bg);
        frame.render_widget(Paragraph::new(lines).style(style), self.area);
    }
}
