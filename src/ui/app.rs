//! Application state and the event loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;
use ratatui::{backend::Backend, layout::Rect, style::Style, Frame, Terminal};

use crate::catalog::{Catalog, PreloadFields};
use crate::conf::ConfigStore;
use crate::ui::panes::{FieldsPane, GridPane, LabelPane};
use crate::ui::theme::DEFAULT_THEME;

/// How long the save confirmation stays on screen.
const SAVE_FLASH: Duration = Duration::from_secs(1);
/// How long the search echo survives after the last keystroke.
const SEARCH_ECHO: Duration = Duration::from_millis(1500);
/// Repaint cadence while an overlay is live.
const OVERLAY_REFRESH: Duration = Duration::from_millis(500);
/// Input poll timeout; bounded so the overlay timers stay serviced.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

const SAVED_TEXT: &str = "--== Saved ==--";
const HEADER_FIELDS: &str = "_Settings_";
const HEADER_GRID: &str = "_Extensions_";
const HELP_TEXT: &str =
    "^S: Save    ^Q/^X: Quit    ^R: Reset    ENTER/SPACE: Toggle    TAB: Switch field    Arrows: Move    Type: Search";

/// The main application state: the catalog, every pane, the config
/// store, and the transient overlay timers.
pub struct App {
    catalog: Catalog,
    store: ConfigStore,

    header_fields: LabelPane,
    header_grid: LabelPane,
    help: LabelPane,
    overlay: LabelPane,
    fields: FieldsPane,
    grid: GridPane,

    viewport: Rect,
    should_quit: bool,
    needs_repaint: bool,

    save_flash_until: Option<Instant>,
    search_echo_until: Option<Instant>,
    search_buffer: String,
    last_overlay_paint: Option<Instant>,
}

fn is_search_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')
}

impl App {
    pub fn new(mut catalog: Catalog, fields: PreloadFields, store: ConfigStore) -> Self {
        let header_style = Style::default()
            .fg(DEFAULT_THEME.header_fg)
            .bg(DEFAULT_THEME.header_bg);
        let help_style = Style::default()
            .fg(DEFAULT_THEME.help_fg)
            .bg(DEFAULT_THEME.help_bg);
        let overlay_style = Style::default()
            .fg(DEFAULT_THEME.overlay_fg)
            .bg(DEFAULT_THEME.overlay_bg);

        let mut header_fields = LabelPane::new(true, '=', header_style);
        header_fields.set_text(HEADER_FIELDS);
        let mut header_grid = LabelPane::new(true, '=', header_style);
        header_grid.set_text(HEADER_GRID);
        let mut help = LabelPane::new(false, ' ', help_style);
        help.set_text(HELP_TEXT);
        let overlay = LabelPane::new(true, ' ', overlay_style);

        let mut fields = FieldsPane::new(fields);
        // the flags start out mirroring the first field's tokens
        fields.set_active(0, &mut catalog);

        App {
            catalog,
            store,
            header_fields,
            header_grid,
            help,
            overlay,
            fields,
            grid: GridPane::new(),
            viewport: Rect::default(),
            should_quit: false,
            needs_repaint: true,
            save_flash_until: None,
            search_echo_until: None,
            search_buffer: String::new(),
            last_overlay_paint: None,
        }
    }

    /// Run the event loop until a quit key arrives. The caller owns
    /// terminal setup and restore.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick();

            if self.needs_repaint || self.overlay_refresh_due() {
                // A failed draw (terminal momentarily too small, for
                // instance) re-arms the repaint instead of ending the
                // session.
                match terminal.draw(|frame| self.render(frame)) {
                    Ok(_) => {
                        self.needs_repaint = false;
                        if self.overlay_active() {
                            self.last_overlay_paint = Some(Instant::now());
                        }
                    }
                    Err(err) => {
                        warn!("repaint failed: {err}");
                        self.needs_repaint = true;
                    }
                }
            }

            if self.should_quit {
                break;
            }

            if event::poll(POLL_TIMEOUT)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key);
                    }
                    Event::Resize(width, height) => {
                        self.relayout(Rect::new(0, 0, width, height));
                        self.needs_repaint = true;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Expire the overlay timers; an expiry schedules a full repaint.
    fn tick(&mut self) {
        let now = Instant::now();
        if self.save_flash_until.is_some_and(|until| now > until) {
            self.save_flash_until = None;
            self.needs_repaint = true;
        }
        if self.search_echo_until.is_some_and(|until| now > until) {
            self.search_echo_until = None;
            self.search_buffer.clear();
            self.needs_repaint = true;
        }
    }

    fn overlay_active(&self) -> bool {
        self.save_flash_until.is_some() || self.search_echo_until.is_some()
    }

    fn overlay_refresh_due(&self) -> bool {
        self.overlay_active()
            && self
                .last_overlay_paint
                .is_none_or(|at| at.elapsed() >= OVERLAY_REFRESH)
    }

    /// The search echo wins when both overlays are live; it reflects
    /// the most recent keystroke.
    fn overlay_text(&self) -> Option<String> {
        if self.search_echo_until.is_some() {
            return Some(self.search_buffer.clone());
        }
        if self.save_flash_until.is_some() {
            return Some(SAVED_TEXT.to_string());
        }
        None
    }

    /// Pin every pane to its slice of the viewport: header, the three
    /// field lines, a second header, the grid, and the key help on the
    /// last row.
    fn relayout(&mut self, viewport: Rect) {
        self.viewport = viewport;
        let (w, h) = (viewport.width, viewport.height);
        let row = |y: u16, height: u16| -> Rect {
            if y >= h {
                Rect::default()
            } else {
                Rect::new(0, y, w, height.min(h - y))
            }
        };
        self.header_fields.relayout(row(0, 1));
        self.fields.relayout(row(1, 3));
        self.header_grid.relayout(row(4, 1));
        self.grid.relayout(row(5, h.saturating_sub(6)), &self.catalog);
        self.help.relayout(row(h.saturating_sub(1), 1));
    }

    /// The overlay hugs the lower-right corner and is exactly as wide
    /// as its text.
    fn layout_overlay(&mut self) {
        let len = self.overlay.text().chars().count() as u16;
        let width = len.min(self.viewport.width);
        let x = self.viewport.width.saturating_sub(3 + len);
        let y = self.viewport.height.saturating_sub(4);
        self.overlay.relayout(Rect::new(x, y, width, 1));
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area != self.viewport {
            self.relayout(area);
        }

        self.header_fields.render(frame);
        self.fields.render(frame);
        self.header_grid.render(frame);
        self.grid.render(frame, &self.catalog);
        self.help.render(frame);

        if let Some(text) = self.overlay_text() {
            self.overlay.set_text(text);
            self.layout_overlay();
            self.overlay.render(frame);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('q' | 'x' | 'c') if ctrl => self.should_quit = true,
            KeyCode::Tab => {
                self.fields.cycle_active(&mut self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Up => {
                self.grid.move_highlight(0, -1, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Down => {
                self.grid.move_highlight(0, 1, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Left => {
                self.grid.move_highlight(-1, 0, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Right => {
                self.grid.move_highlight(1, 0, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.grid.toggle_highlighted(&mut self.catalog);
                self.fields.toggle_token(self.grid.highlighted(), &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Char('r') if ctrl => {
                self.fields.reset(&mut self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Home => {
                self.grid.jump_first();
                self.needs_repaint = true;
            }
            KeyCode::End => {
                self.grid.jump_last(&self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::PageDown => {
                self.grid.page(1, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::PageUp => {
                self.grid.page(-1, &self.catalog);
                self.needs_repaint = true;
            }
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char(c) if !ctrl && is_search_char(c) => self.search_key(c),
            _ => {}
        }
    }

    /// Persist the three values. The confirmation overlay is armed only
    /// when the store reports success.
    fn save(&mut self) {
        match self.store.save(self.fields.fields()) {
            Ok(()) => {
                self.save_flash_until = Some(Instant::now() + SAVE_FLASH);
                self.last_overlay_paint = None;
            }
            Err(err) => warn!("save failed: {err:#}"),
        }
        self.needs_repaint = true;
    }

    fn search_key(&mut self, c: char) {
        if self.search_buffer.is_empty() {
            self.grid.begin_search();
        }
        self.search_buffer.push(c.to_ascii_lowercase());
        self.search_echo_until = Some(Instant::now() + SEARCH_ECHO);
        self.last_overlay_paint = None;
        self.grid.advance_search(&self.search_buffer, &self.catalog);
        self.needs_repaint = true;
    }
}
