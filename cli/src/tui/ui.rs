use chrono::Datelike;
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Gauge, Padding, Paragraph, Row, Table},
};
use heatlog_core::service::calendar::{week_columns, MAX_LEVEL};
use heatlog_core::{CalendarCell, TrendView};

use crate::calendar::{level_color, month_header};
use crate::tui::app::App;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    up: Color,
    down: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    up: Color::Green,
    down: Color::Red,
};

const WEEKDAYS: [&str; 7] = ["   ", "Mon", "   ", "Wed", "   ", "Fri", "   "];
const BREAKDOWN_ROWS: usize = 8;

fn panel<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(title)
}

fn heat(level: u8) -> Color {
    let (r, g, b) = level_color(level);
    Color::Rgb(r, g, b)
}

fn trend_color(pct: f64) -> Color {
    if pct >= 0.0 {
        THEME.up
    } else {
        THEME.down
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(11), // Heatmap
            Constraint::Min(8),     // Trend + sidebar
            Constraint::Length(1),  // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, main_layout[0]);
    draw_heatmap(frame, &app.cells, main_layout[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(main_layout[2]);

    draw_trend(frame, app, content[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(12)])
        .split(content[2]);
    draw_breakdown(frame, app, sidebar[0]);
    draw_stats(frame, app, sidebar[1]);

    draw_footer(frame, app, main_layout[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1), Constraint::Length(20)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "HEATLOG",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let can_advance = app.year < app.session.today().year();
    let nav = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(format!(" {} ", app.year), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(if can_advance { THEME.text } else { THEME.muted })),
    ]);
    let nav = Paragraph::new(nav)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        area,
    );
}

fn draw_heatmap(frame: &mut Frame, cells: &[CalendarCell], area: Rect) {
    let columns = week_columns(cells);
    let mut lines = vec![Line::from(Span::styled(
        format!("    {}", month_header(cells, 2, columns.len())),
        Style::default().fg(THEME.muted),
    ))];

    for (row, weekday) in WEEKDAYS.iter().enumerate() {
        let mut spans = vec![Span::styled(format!("{} ", weekday), Style::default().fg(THEME.muted))];
        for column in &columns {
            match column[row] {
                Some(cell) => spans.push(Span::styled("■ ", Style::default().fg(heat(cell.level)))),
                None => spans.push(Span::raw("  ")),
            }
        }
        lines.push(Line::from(spans));
    }

    let mut legend = vec![Span::styled("    Less ", Style::default().fg(THEME.muted))];
    for level in 0..=MAX_LEVEL {
        legend.push(Span::styled("■ ", Style::default().fg(heat(level))));
    }
    legend.push(Span::styled("More", Style::default().fg(THEME.muted)));
    lines.push(Line::from(""));
    lines.push(Line::from(legend));

    let active = cells.iter().filter(|c| c.score > 0.0).count();
    let title = format!(" Activity ({} active days) ", active);
    frame.render_widget(Paragraph::new(lines).block(panel(title)), area);
}

fn draw_trend(frame: &mut Frame, app: &App, area: Rect) {
    let trend = &app.trend;
    // Bars are labelled by day-of-month (daily) or month/day of the week start (weekly)
    let labels: Vec<String> = trend
        .labels
        .iter()
        .map(|l| match app.view() {
            TrendView::Daily => l.get(8..).unwrap_or(l).to_string(),
            TrendView::Weekly => l.get(5..).unwrap_or(l).to_string(),
        })
        .collect();

    let bars: Vec<Bar> = labels
        .iter()
        .zip(trend.scores.iter())
        .map(|(label, score)| {
            Bar::default()
                .label(label.as_str())
                .value(score.round().max(0.0) as u64)
                .style(Style::default().fg(THEME.up))
                .text_value(if *score > 0.0 { format!("{:.0}", score) } else { String::new() })
        })
        .collect();

    let view = match app.view() {
        TrendView::Daily => "Daily",
        TrendView::Weekly => "Weekly",
    };
    let title = Line::from(vec![
        Span::raw(format!(" {} trend ", view)),
        Span::styled(
            format!("{:+.1}% ", trend.trend_percentage),
            Style::default().fg(trend_color(trend.trend_percentage)).add_modifier(Modifier::BOLD),
        ),
    ]);

    let bar_width = match app.view() {
        TrendView::Daily => 2,
        TrendView::Weekly => 5,
    };
    let chart = BarChart::default()
        .block(panel(title))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_breakdown(frame: &mut Frame, app: &App, area: Rect) {
    let breakdown = &app.breakdown;
    let rows: Vec<Row> = breakdown
        .rows()
        .into_iter()
        .take(BREAKDOWN_ROWS)
        .map(|r| {
            let color = parse_hex(&r.color).unwrap_or(THEME.text);
            Row::new(vec![
                Cell::from(Span::styled("■ ", Style::default().fg(color))),
                Cell::from(r.label),
                Cell::from(format!("{:.1}h", r.time_minutes / 60.0)),
                Cell::from(format!("{:.0}", r.score_points)),
            ])
        })
        .collect();

    let header = Row::new(vec!["", "Label", "Time", "Score"]).style(Style::default().fg(THEME.primary));
    let widths = [
        Constraint::Length(2),
        Constraint::Min(10),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    let title = format!(" Breakdown ({}d) ", app.window_days);
    let table = Table::new(rows, widths).header(header).block(panel(title));
    frame.render_widget(table, area);
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let stats = &app.stats;
    let metric = |name: &str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<12}", name), Style::default().fg(THEME.muted)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };
    let lines = vec![
        metric("Average:", format!("{:.1}", stats.avg_daily_score), THEME.text),
        metric("Best day:", format!("{:.1}", stats.max_score), THEME.text),
        metric("Total:", format!("{:.1}", stats.total_score), THEME.text),
        metric("Activities:", stats.total_activities.to_string(), THEME.text),
        metric(
            "Trend:",
            format!("{:+.1}%", stats.trend_percentage),
            trend_color(stats.trend_percentage),
        ),
    ];
    let title = format!(" Summary ({}d) ", stats.period_days);
    frame.render_widget(Paragraph::new(lines).block(panel(title)), chunks[0]);

    let ratio = (stats.productivity_rate / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(panel(" Productive days "))
        .gauge_style(Style::default().fg(THEME.up))
        .ratio(ratio)
        .label(format!("{}/{} ({:.0}%)", stats.productive_days, stats.period_days, stats.productivity_rate));
    frame.render_widget(gauge, chunks[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match &app.status {
        Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(THEME.down))),
        None => Line::from(vec![
            Span::styled("YEAR: ", Style::default().fg(THEME.muted)),
            Span::styled("←/→ ", Style::default().fg(THEME.text)),
            Span::raw("  "),
            Span::styled("VIEW: ", Style::default().fg(THEME.muted)),
            Span::styled("d/w/Tab ", Style::default().fg(THEME.text)),
            Span::raw("  "),
            Span::styled("RELOAD: ", Style::default().fg(THEME.muted)),
            Span::styled("r ", Style::default().fg(THEME.text)),
            Span::raw("  "),
            Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
            Span::styled("q", Style::default().fg(THEME.text)),
        ]),
    };
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), area);
}

/// `#rrggbb` or `#rgb` to a terminal color.
fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}
