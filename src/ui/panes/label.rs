//! Single-line label pane with optional centering and a fill character.

use ratatui::{layout::Rect, style::Style, Frame};

/// A one-row text region. Repaint fills the row with the fill character
/// and splices the text in, left-aligned or centered (offset floored,
/// clamped to zero), truncated to the pane width.
pub struct LabelPane {
    text: String,
    centered: bool,
    fill: char,
    style: Style,
    area: Rect,
}

impl LabelPane {
    pub fn new(centered: bool, fill: char, style: Style) -> Self {
        Self {
            text: String::new(),
            centered,
            fill,
            style,
            area: Rect::default(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn relayout(&mut self, area: Rect) {
        self.area = area;
    }

    fn compose(&self, width: usize) -> String {
        let mut row: Vec<char> = std::iter::repeat(self.fill).take(width).collect();
        let offset = if self.centered {
            width.saturating_sub(self.text.chars().count()) / 2
        } else {
            0
        };
        for (i, ch) in self.text.chars().enumerate() {
            match row.get_mut(offset + i) {
                Some(cell) => *cell = ch,
                None => break,
            }
        }
        row.into_iter().collect()
    }

    pub fn render(&self, frame: &mut Frame) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let row = self.compose(self.area.width as usize);
        frame
            .buffer_mut()
            .set_string(self.area.x, self.area.y, row, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str, centered: bool, fill: char) -> LabelPane {
        let mut pane = LabelPane::new(centered, fill, Style::default());
        pane.set_text(text);
        pane
    }

    #[test]
    fn left_aligned_pads_with_fill() {
        assert_eq!(label("hi", false, '.').compose(5), "hi...");
    }

    #[test]
    fn centered_offset_is_floored() {
        // 7 - 2 = 5, offset 2
        assert_eq!(label("hi", true, '=').compose(7), "==hi===");
    }

    #[test]
    fn text_wider_than_pane_is_truncated() {
        assert_eq!(label("overlong", true, ' ').compose(4), "over");
        assert_eq!(label("overlong", false, ' ').compose(4), "over");
    }

    #[test]
    fn empty_pane_is_all_fill() {
        assert_eq!(label("", true, '=').compose(3), "===");
    }
}
