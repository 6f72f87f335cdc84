use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Expenses ({}) {} ", app.filtered.len(), app.range_label());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));

    if app.filtered.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses to show", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add <amount> <category> [YYYY-MM-DD] or :import a CSV",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["#", "Date", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);
    let symbol = app.symbol();

    let rows: Vec<Row> = app
        .filtered
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(expense.day_key()),
                Cell::from(truncate(&expense.category, 30)),
                Cell::from(Span::styled(
                    format_amount(expense.amount, symbol),
                    theme::amount_style(),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
