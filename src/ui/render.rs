use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use super::util::truncate;

const HELP_WIDTH: u16 = 88;

/// Normal-mode keys shown in the help overlay, two per row.
const KEY_HINTS: &[(&str, &str)] = &[
    ("j/k", "Move cursor"),
    ("1-3", "Jump to screen"),
    ("Tab", "Next screen"),
    ("g/G", "First/last row"),
    ("H/L", "Previous/next month"),
    ("Ctrl-d/u", "Half page down/up"),
    ("n/p", "Cycle pie slice"),
    ("v", "Toggle daily/monthly"),
    (":", "Command mode"),
    ("D", "Delete selected"),
    ("Esc", "Clear status"),
    ("Ctrl-q", "Quit"),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let [tabs, body, status, command] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_tab_bar(f, tabs, app);
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, body, app),
        Screen::Expenses => super::screens::expenses::render(f, body, app),
        Screen::Budgets => super::screens::budgets::render(f, body, app),
    }
    render_status_bar(f, status, app);
    render_command_bar(f, command, app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let screens = Screen::all();
    let selected = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    let titles = screens
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}:{s}", i + 1));

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("|", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, area);
}

fn screen_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Dashboard => "v view  n/p slice  H/L month  ? help ",
        Screen::Expenses => "j/k move  D delete  :edit  ? help ",
        Screen::Budgets => ":budget  :cb set  D delete  ? help ",
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_color = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode = Span::styled(
        format!(" {} ", app.input_mode),
        Style::default()
            .fg(theme::HEADER_BG)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    );

    let hints = screen_hints(app.screen);
    let context = format!(
        " {} \u{b7} {} \u{b7} {} \u{b7} {} shown \u{b7} {}",
        app.range_label(),
        app.reference_month(),
        app.bucket,
        app.filtered.len(),
        app.currency
    );
    let room = (area.width as usize)
        .saturating_sub(mode.width())
        .saturating_sub(hints.chars().count());
    let context = format!("{:<room$}", truncate(&context, room));

    let line = Line::from(vec![
        mode,
        Span::raw(context),
        Span::styled(hints, theme::dim_style()),
    ]);
    f.render_widget(
        Paragraph::new(line).style(theme::status_bar_style()),
        area,
    );
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.input_mode {
        InputMode::Command => {
            let typed = app.command_input.chars().count() as u16;
            f.set_cursor_position((area.x + 1 + typed, area.y));
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::raw(app.command_input.as_str()),
            ])
        }
        InputMode::Confirm => Line::from(vec![
            Span::styled(app.confirm_message.as_str(), Style::default().fg(theme::YELLOW)),
            Span::styled(" [y/N]", Style::default().fg(theme::RED)),
        ]),
        InputMode::Normal if app.status_message.is_empty() => {
            Line::styled(" : command   ? help", theme::dim_style())
        }
        InputMode::Normal => Line::raw(app.status_message.as_str()),
    };

    f.render_widget(Paragraph::new(line).style(theme::command_bar_style()), area);
}

fn heading(title: &str) -> Line<'static> {
    Line::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    )
}

fn key_rows() -> Vec<Line<'static>> {
    KEY_HINTS
        .chunks(2)
        .map(|pair| {
            let cells: String = pair
                .iter()
                .map(|(key, action)| format!("  {key:<10}{action:<30}"))
                .collect();
            Line::styled(cells, theme::normal_style())
        })
        .collect()
}

/// One line per command, aliases folded into their long name.
fn command_rows() -> Vec<Line<'static>> {
    let mut by_description: BTreeMap<&str, &str> = BTreeMap::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        let slot = by_description.entry(cmd.description).or_insert(name);
        if name.len() > slot.len() {
            *slot = name;
        }
    }

    let mut rows: Vec<(&str, &str)> = by_description
        .into_iter()
        .map(|(description, name)| (name, description))
        .collect();
    rows.sort_unstable();
    rows.into_iter()
        .map(|(name, description)| {
            Line::styled(format!("  :{name:<18}{description}"), theme::normal_style())
        })
        .collect()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut lines = vec![heading("Keys")];
    lines.extend(key_rows());
    lines.push(Line::raw(""));
    lines.push(heading("Commands"));
    lines.extend(command_rows());
    lines.push(Line::raw(""));
    lines.push(Line::styled(" any key closes this window", theme::dim_style()));

    let popup = centered(area, HELP_WIDTH, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" ExpenseTUI ")
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        popup,
    );
}
