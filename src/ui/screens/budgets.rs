use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::analytics::BudgetProgress;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

const BAR_WIDTH: usize = 20;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_overall(f, chunks[0], app);
    render_categories(f, chunks[1], app);
}

fn progress_spans(progress: &BudgetProgress, symbol: &str) -> Vec<Span<'static>> {
    let color = theme::progress_color(progress.fill_ratio(), progress.over_budget);
    vec![
        Span::styled(
            format!(
                "{}/{} ",
                format_amount(progress.used, symbol),
                format_amount(progress.limit, symbol)
            ),
            Style::default().fg(color),
        ),
        Span::styled(progress_bar(progress.fill_ratio(), BAR_WIDTH), Style::default().fg(color)),
        Span::styled(
            format!(" {}", progress.describe()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]
}

fn render_overall(f: &mut Frame, area: Rect, app: &App) {
    let symbol = app.symbol();
    let overall = &app.summary.overall;

    let mut first = vec![Span::styled(format!("{:<18}", "Overall"), theme::normal_style())];
    first.extend(progress_spans(overall, symbol));

    let remaining = Line::from(Span::styled(
        format!("{:<18}{} remaining", "", format_amount(overall.remaining, symbol)),
        theme::dim_style(),
    ));

    let panel = Paragraph::new(vec![Line::from(first), remaining]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Budget for {} ", app.reference_month()),
                theme::title_style(),
            )),
    );
    f.render_widget(panel, area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Category Budgets ", theme::title_style()));

    if app.summary.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No category budgets set", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Use :category-budget <category> <amount> to set a spending limit",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let symbol = app.symbol();
    let items: Vec<ListItem> = app
        .summary
        .categories
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, cat)| {
            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let mut spans = vec![Span::styled(
                format!("{:<18}", truncate(&cat.category, 17)),
                style,
            )];
            spans.extend(progress_spans(&cat.progress, symbol));
            ListItem::new(Line::from(spans))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
