use ratatui::style::{Color, Modifier, Style};

// ── Palette (Tokyo Night) ──────────────────────────────────────

pub(crate) const HEADER_BG: Color = Color::Rgb(26, 27, 38);
pub(crate) const TEXT: Color = Color::Rgb(192, 202, 245);
pub(crate) const TEXT_DIM: Color = Color::Rgb(86, 95, 137);
pub(crate) const SURFACE: Color = Color::Rgb(36, 40, 59);
pub(crate) const OVERLAY: Color = Color::Rgb(65, 72, 104);
pub(crate) const COMMAND_BG: Color = Color::Rgb(22, 22, 30);
pub(crate) const ACCENT: Color = Color::Rgb(122, 162, 247);
pub(crate) const GREEN: Color = Color::Rgb(158, 206, 106);
pub(crate) const YELLOW: Color = Color::Rgb(224, 175, 104);
pub(crate) const RED: Color = Color::Rgb(247, 118, 142);

/// Ten-color categorical palette for chart series.
pub(crate) const SERIES: [Color; 10] = [
    Color::Rgb(31, 119, 180),
    Color::Rgb(255, 127, 14),
    Color::Rgb(44, 160, 44),
    Color::Rgb(214, 39, 40),
    Color::Rgb(148, 103, 189),
    Color::Rgb(140, 86, 75),
    Color::Rgb(227, 119, 194),
    Color::Rgb(127, 127, 127),
    Color::Rgb(188, 189, 34),
    Color::Rgb(23, 190, 207),
];

pub(crate) fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

// ── Styles ─────────────────────────────────────────────────────

pub(crate) fn header_style() -> Style {
    Style::new().fg(TEXT).bg(HEADER_BG).add_modifier(Modifier::BOLD)
}

pub(crate) fn title_style() -> Style {
    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::new().fg(HEADER_BG).bg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn normal_style() -> Style {
    Style::new().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::new().fg(TEXT_DIM)
}

pub(crate) fn amount_style() -> Style {
    Style::new().fg(RED)
}

/// Zebra stripe for odd table rows.
pub(crate) fn alt_row_style() -> Style {
    normal_style().bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    normal_style().bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    dim_style().bg(SURFACE)
}

/// Green under 70% used, yellow under 90%, red beyond.
pub(crate) fn progress_color(ratio: f64, over_budget: bool) -> Color {
    match ratio {
        _ if over_budget => RED,
        r if r > 0.9 => RED,
        r if r > 0.7 => YELLOW,
        _ => GREEN,
    }
}
