use ratatui::style::Color;

pub struct Theme {
    pub header_fg: Color,
    pub header_bg: Color,
    pub field_fg: Color,
    pub field_bg: Color,
    pub grid_fg: Color,
    pub grid_bg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub overlay_fg: Color,
    pub overlay_bg: Color,
    pub help_fg: Color,
    pub help_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    header_fg: Color::Black, // section headers on a cyan band
    header_bg: Color::Cyan,
    field_fg: Color::Yellow, // field lines on the main blue background
    field_bg: Color::Blue,
    grid_fg: Color::Yellow,
    grid_bg: Color::Blue,
    highlight_fg: Color::Black, // highlighted grid entry, inverted
    highlight_bg: Color::White,
    overlay_fg: Color::Red, // transient save/search overlay
    overlay_bg: Color::Green,
    help_fg: Color::Black, // key help line, same band as headers
    help_bg: Color::Cyan,
};
