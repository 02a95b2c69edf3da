use chrono::Datelike;
use heatlog_core::service::calendar::{week_columns, MAX_LEVEL};
use heatlog_core::CalendarCell;

/// Heat colors for levels 0..=5, lightest to darkest.
pub const LEVEL_COLORS: [(u8, u8, u8); 6] = [
    (0xeb, 0xed, 0xf0),
    (0x9b, 0xe9, 0xa8),
    (0x40, 0xc4, 0x63),
    (0x30, 0xa1, 0x4e),
    (0x21, 0x6e, 0x39),
    (0x0e, 0x44, 0x29),
];

const WEEKDAY_LABELS: [&str; 7] = ["   ", "Mon", "   ", "Wed", "   ", "Fri", "   "];
const CELL: &str = "■";

pub fn level_color(level: u8) -> (u8, u8, u8) {
    LEVEL_COLORS[level.min(MAX_LEVEL) as usize]
}

fn paint(level: u8) -> String {
    let (r, g, b) = level_color(level);
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, CELL)
}

/// Month names placed over the column holding each month's first day.
pub fn month_header(cells: &[CalendarCell], column_width: usize, columns: usize) -> String {
    let mut header = vec![' '; columns * column_width];
    for cell in cells.iter().filter(|c| c.date.day() == 1) {
        let name = cell.date.format("%b").to_string();
        let start = cell.week_index as usize * column_width;
        for (i, ch) in name.chars().enumerate() {
            if let Some(slot) = header.get_mut(start + i) {
                *slot = ch;
            }
        }
    }
    header.into_iter().collect::<String>().trim_end().to_string()
}

pub fn print_calendar(cells: &[CalendarCell], year: i32) {
    let columns = week_columns(cells);
    let total: f64 = cells.iter().map(|c| c.score).sum();
    let active = cells.iter().filter(|c| c.score > 0.0).count();

    println!("\n\x1b[1;36m{}\x1b[0m  {} active days, {:.0} points", year, active, total);
    println!("    {}", month_header(cells, 2, columns.len()));

    for (row, weekday) in WEEKDAY_LABELS.iter().enumerate() {
        let mut line = format!("{} ", weekday);
        for column in &columns {
            match column[row] {
                Some(cell) => line.push_str(&paint(cell.level)),
                None => line.push(' '),
            }
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }

    let legend: String = (0..=MAX_LEVEL).map(|l| format!("{} ", paint(l))).collect();
    println!("\n    Less {}More", legend);
}
