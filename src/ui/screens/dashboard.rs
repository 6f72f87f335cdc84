use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, List, ListItem, Paragraph,
    },
    Frame,
};
use rust_decimal::Decimal;

use crate::analytics::Bucket;
use crate::chart::{arc_point, legend, pie_layout, series_from_totals, BarChartLayout, PieSlice};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

const PIE_RADIUS: f64 = 100.0;
const EXPLODE: f64 = 8.0;
/// Angular step between radial fill lines.
const PIE_FILL_STEP: f64 = 0.01;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(10),   // Charts
            Constraint::Length(7), // Analysis
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_bar_chart(f, charts[0], app);

    let pie_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(charts[1]);
    let series = series_from_totals(&app.category_totals);
    let slices = pie_layout(&series, PIE_RADIUS);
    render_pie(f, pie_area[0], app, &slices);
    render_legend(f, pie_area[1], app, &series, &slices);

    render_analysis(f, chunks[2], app, &slices);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_empty(f: &mut Frame, area: Rect, title: String, message: &str) {
    let msg = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        theme::dim_style(),
    )))
    .centered()
    .block(titled_block(title));
    f.render_widget(msg, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let symbol = app.symbol();
    let summary = &app.summary;

    render_card(
        f,
        cards[0],
        "Total Spend",
        format_amount(summary.total, symbol),
        theme::ACCENT,
        format!("{} expenses", summary.record_count),
    );
    render_card(
        f,
        cards[1],
        "Average",
        format_amount(summary.average, symbol),
        theme::TEXT,
        "per expense".into(),
    );
    render_card(
        f,
        cards[2],
        "Forecast (30 days)",
        format_amount(summary.predicted_monthly, symbol),
        theme::YELLOW,
        "linear over recorded span".into(),
    );

    let overall = &summary.overall;
    let month_color = if overall.over_budget {
        theme::RED
    } else {
        theme::GREEN
    };
    let subtitle = if overall.limit > Decimal::ZERO {
        format!("of {}", format_amount(overall.limit, symbol))
    } else {
        "no budget set".into()
    };
    render_card(
        f,
        cards[3],
        &format!("This Month ({})", app.reference_month()),
        format_amount(summary.current_month_total, symbol),
        month_color,
        subtitle,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: Color,
    subtitle: String,
) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(titled_block(format!(" {title} ")));

    f.render_widget(text, area);
}

/// `2024-03-07` → `03-07` for daily bars; month keys stay as they are.
fn axis_label(key: &str, bucket: Bucket) -> String {
    match bucket {
        Bucket::Daily => key.get(5..).unwrap_or(key).to_string(),
        Bucket::Monthly => key.to_string(),
    }
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn render_bar_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} Spending ({}) ", app.bucket, app.range_label());
    if app.bucket_series.is_empty() {
        render_empty(f, area, title, "No expenses yet. Add one with :add");
        return;
    }

    let layout = BarChartLayout::build(&app.bucket_series, app.bucket);
    let frame = layout.frame;
    let block = titled_block(format!(
        "{}peak {} ",
        title,
        tick_label(layout.max_value())
    ));

    // Braille gives two dots per cell horizontally
    let inner_width = block.inner(area).width.max(1) as f64;
    let fill_step = (frame.width / (inner_width * 2.0)).max(0.5);
    let flip = |y: f64| frame.height - y;
    let bucket = app.bucket;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, frame.width])
        .y_bounds([0.0, frame.height])
        .paint(|ctx| {
            let (x0, x1) = frame.x_range();
            ctx.draw(&CanvasLine::new(
                x0,
                flip(layout.baseline),
                x1,
                flip(layout.baseline),
                theme::OVERLAY,
            ));

            for bar in &layout.bars {
                let top = flip(bar.y);
                let bottom = flip(bar.y + bar.height);
                let mut x = bar.x;
                while x <= bar.x + bar.width {
                    ctx.draw(&CanvasLine::new(x, bottom, x, top, theme::ACCENT));
                    x += fill_step;
                }
            }

            ctx.layer();
            for tick in &layout.y_ticks {
                ctx.print(
                    0.0,
                    flip(tick.position),
                    Span::styled(tick_label(tick.value), theme::dim_style()),
                );
            }
            for bar in layout.labeled_bars() {
                ctx.print(
                    bar.x,
                    frame.margin.bottom / 2.0,
                    Span::styled(axis_label(&bar.key, bucket), theme::dim_style()),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_pie(f: &mut Frame, area: Rect, app: &App, slices: &[PieSlice]) {
    let title = " Spending by Category ".to_string();
    if slices.iter().all(|s| s.span() <= 0.0) {
        render_empty(f, area, title, "Nothing to chart");
        return;
    }

    let block = titled_block(title);
    let inner = block.inner(area);
    // Terminal cells are about twice as tall as wide; keep the pie round.
    let aspect = inner.width.max(1) as f64 / (2.0 * inner.height.max(1) as f64);
    let reach = PIE_RADIUS + EXPLODE * 2.0;
    let (x_reach, y_reach) = if aspect >= 1.0 {
        (reach * aspect, reach)
    } else {
        (reach, reach / aspect)
    };
    let selected = app.slice_index;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-x_reach, x_reach])
        .y_bounds([-y_reach, y_reach])
        .paint(|ctx| {
            for (i, slice) in slices.iter().enumerate() {
                if slice.span() <= 0.0 {
                    continue;
                }
                let color = theme::series_color(slice.color_index);
                // the highlighted sector is pushed out along its bisector
                let (cx, cy) = if i == selected {
                    arc_point(slice.mid_angle(), EXPLODE)
                } else {
                    (0.0, 0.0)
                };
                let steps = ((slice.span() / PIE_FILL_STEP).ceil() as usize).max(1);
                for step in 0..=steps {
                    let angle = slice.start_angle + slice.span() * step as f64 / steps as f64;
                    let (x, y) = arc_point(angle, PIE_RADIUS);
                    ctx.draw(&CanvasLine::new(cx, -cy, cx + x, -(cy + y), color));
                }
            }

            ctx.layer();
            if let Some(slice) = slices.get(selected).filter(|s| s.span() > 0.0) {
                let (x, y) = slice.centroid;
                ctx.print(
                    x,
                    -y,
                    Span::styled(
                        format!("{:.1}%", slice.share_percent),
                        Style::default()
                            .fg(theme::HEADER_BG)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_legend(
    f: &mut Frame,
    area: Rect,
    app: &App,
    series: &[(String, f64)],
    slices: &[PieSlice],
) {
    let symbol = app.symbol();
    let items: Vec<ListItem> = legend(series)
        .into_iter()
        .map(|entry| {
            let index = app
                .category_totals
                .iter()
                .position(|t| t.category == entry.category);
            let total = index
                .and_then(|i| app.category_totals.get(i))
                .map_or(Decimal::ZERO, |t| t.total);
            let share = index
                .and_then(|i| slices.get(i))
                .map_or(0.0, |s| s.share_percent);

            let name_style = if index == Some(app.slice_index) {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    "■ ",
                    Style::default().fg(theme::series_color(entry.color_index)),
                ),
                Span::styled(format!("{:<16}", truncate(&entry.category, 16)), name_style),
                Span::styled(
                    format!(" {:>12}", format_amount(total, symbol)),
                    theme::amount_style(),
                ),
                Span::styled(format!(" {share:>5.1}%"), theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(titled_block(" Legend (n/p to select) ".into()));
    f.render_widget(list, area);
}

fn render_analysis(f: &mut Frame, area: Rect, app: &App, slices: &[PieSlice]) {
    let symbol = app.symbol();
    let summary = &app.summary;
    let label = |s: &str| Span::styled(format!("{s:<18}"), theme::dim_style());

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        label("Top category"),
        match &summary.top_category {
            Some(top) => Span::styled(
                format!("{} ({})", top.category, format_amount(top.total, symbol)),
                theme::normal_style(),
            ),
            None => Span::styled("none", theme::dim_style()),
        },
    ]));

    let overall = &summary.overall;
    let overall_color = if overall.over_budget {
        theme::RED
    } else {
        theme::GREEN
    };
    lines.push(Line::from(vec![
        label("Monthly budget"),
        Span::styled(overall.describe(), Style::default().fg(overall_color)),
    ]));

    let over: Vec<String> = summary
        .over_budget_categories()
        .map(|c| format!("{} ({})", c.category, c.progress.describe()))
        .collect();
    lines.push(Line::from(vec![
        label("Over budget"),
        if over.is_empty() {
            Span::styled("none", theme::dim_style())
        } else {
            Span::styled(over.join(", "), Style::default().fg(theme::RED))
        },
    ]));

    if let Some(total) = app.category_totals.get(app.slice_index) {
        let share = slices
            .get(app.slice_index)
            .map_or(0.0, |s| s.share_percent);
        lines.push(Line::from(vec![
            label("Selected"),
            Span::styled(
                format!(
                    "{}: {} ({share:.1}% of spend)",
                    total.category,
                    format_amount(total.total, symbol)
                ),
                Style::default().fg(theme::ACCENT),
            ),
        ]));
    }

    lines.push(Line::from(vec![
        label("Showing"),
        Span::styled(app.range_label(), theme::dim_style()),
    ]));

    let panel = Paragraph::new(lines).block(titled_block(" Analysis ".into()));
    f.render_widget(panel, area);
}
