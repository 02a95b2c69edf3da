use heatlog_core::{Breakdown, DayDetails, LabelRegistry, PeriodStats, RangeCalendar, TrendSeries, TrendView};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BAR_WIDTH: usize = 40;
const DESCRIPTION_WIDTH: usize = 36;

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "Label")]
    name: String,
    #[tabled(rename = "Points/min")]
    rate: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Min")]
    minutes: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Points")]
    points: String,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Time (h)")]
    hours: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn styled(table: &mut Table) -> &mut Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
}

pub fn print_labels(labels: &LabelRegistry) {
    if labels.is_empty() {
        println!("No labels defined.");
        return;
    }
    let rows: Vec<LabelRow> = labels
        .iter()
        .map(|l| LabelRow {
            name: l.name.clone(),
            rate: format!("{:.2}", l.productivity_rate),
            color: l.color.clone(),
            description: truncate(&l.description, DESCRIPTION_WIDTH),
        })
        .collect();
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
}

pub fn print_day(details: &DayDetails) {
    println!(
        "\n\x1b[1;36m{} ({})\x1b[0m  score {:.2}, level {}, {:.0} min",
        details.date.format("%Y-%m-%d"),
        details.date.format("%a"),
        details.total_score,
        details.level,
        details.total_minutes
    );
    if details.activities.is_empty() {
        println!("No activities logged.");
        return;
    }

    let rows: Vec<ActivityRow> = details
        .activities
        .iter()
        .map(|a| ActivityRow {
            id: a.id.to_string()[..8].to_string(),
            label: if a.known_label { a.label.clone() } else { format!("{} (unknown)", a.label) },
            minutes: format!("{:.0}", a.duration_minutes),
            rate: format!("{:.2}", a.rate),
            points: format!("{:.2}", a.points),
        })
        .collect();
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
}

pub fn print_breakdown(breakdown: &Breakdown, days: usize) {
    println!("\n\x1b[1;36mActivity breakdown, last {} days\x1b[0m", days);
    if breakdown.is_empty() {
        println!("No activities in this period.");
        return;
    }

    let rows: Vec<BreakdownRow> = breakdown
        .rows()
        .into_iter()
        .map(|r| BreakdownRow {
            share: percent_of(r.score_points, breakdown.total_score),
            label: r.label,
            hours: format!("{:.1}", r.time_minutes / 60.0),
            score: format!("{:.2}", r.score_points),
            count: r.activity_count,
        })
        .collect();
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
    println!(
        "Total: {:.1}h, {:.2} points",
        breakdown.total_time / 60.0,
        breakdown.total_score
    );
}

pub fn print_stats(stats: &PeriodStats) {
    let rows = vec![
        StatRow { metric: "Period (days)", value: stats.period_days.to_string() },
        StatRow { metric: "Productive days", value: stats.productive_days.to_string() },
        StatRow { metric: "Productivity rate", value: format!("{:.1}%", stats.productivity_rate) },
        StatRow { metric: "Average daily score", value: format!("{:.2}", stats.avg_daily_score) },
        StatRow { metric: "Best day", value: format!("{:.2}", stats.max_score) },
        StatRow { metric: "Worst day", value: format!("{:.2}", stats.min_score) },
        StatRow { metric: "Total score", value: format!("{:.2}", stats.total_score) },
        StatRow { metric: "Activities", value: stats.total_activities.to_string() },
        StatRow { metric: "Trend", value: format!("{:+.1}%", stats.trend_percentage) },
    ];
    let mut table = Table::new(rows);
    println!("{}", styled(&mut table));
}

pub fn print_trend(series: &TrendSeries, view: TrendView) {
    let unit = match view {
        TrendView::Daily => "day",
        TrendView::Weekly => "week of",
    };
    println!(
        "\n\x1b[1;36m{} trend\x1b[0m ({:+.1}%)",
        match view {
            TrendView::Daily => "Daily",
            TrendView::Weekly => "Weekly",
        },
        series.trend_percentage
    );

    let max = series.scores.iter().copied().fold(0.0, f64::max);
    for (label, score) in series.labels.iter().zip(series.scores.iter()) {
        let bar_len = if max > 0.0 { (score / max * BAR_WIDTH as f64).round() as usize } else { 0 };
        let visual = if *score > 0.0 { "█".repeat(bar_len.max(1)) } else { "·".to_string() };
        println!("  {} {} {} {:.2}", unit, label, visual, score);
    }
}

pub fn print_range(range: &RangeCalendar) {
    for (date, score) in &range.calendar_data {
        println!("  {} {:>8.2}", date.format("%Y-%m-%d"), score);
    }
    println!("───────────────────────────────────────────");
    println!(
        "{} recorded days, {} productive, best {:.2}, average {:.2}",
        range.total_days, range.productive_days, range.max_score, range.avg_score
    );
}

fn percent_of(part: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.1}%", part / total * 100.0)
    } else {
        "-".to_string()
    }
}

/// Cuts `text` to at most `max` terminal columns, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
