use chrono::{Datelike, Days, Duration, Local, NaiveDate, Weekday};
use anyhow::{anyhow, Result};

use crate::error::{CoreError, CoreResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_iso_date(input: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::invalid_date(input))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Sunday on or before `date`.
pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Column of `date` on a Sunday-first grid for its own year.
/// Jan 1 is always column 0, whatever weekday it falls on.
pub fn week_index(date: NaiveDate) -> u32 {
    let jan1 = NaiveDate::from_yo_opt(date.year(), 1).unwrap_or(date);
    let days = (sunday_on_or_before(date) - sunday_on_or_before(jan1)).num_days();
    (days / 7) as u32
}

/// Row of `date` on a Sunday-first grid: Sunday = 0 .. Saturday = 6.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// First and last day of `year`.
pub fn year_bounds(year: i32) -> CoreResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CoreError::YearOutOfRange(year))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CoreError::YearOutOfRange(year))?;
    Ok((first, last))
}

/// `days` days before `date`. Fails with `InvalidDate` past chrono's range.
pub fn days_before(date: NaiveDate, days: u64) -> CoreResult<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| CoreError::invalid_date(format!("{} days before {}", days, date)))
}

/// Inclusive range of the `days` most recent calendar days ending at `end`.
/// `Ok(None)` for an empty window.
pub fn window_bounds(end: NaiveDate, days: usize) -> CoreResult<Option<(NaiveDate, NaiveDate)>> {
    if days == 0 {
        return Ok(None);
    }
    let start = days_before(end, days as u64 - 1)?;
    Ok(Some((start, end)))
}

/// Every date of the window, oldest first.
pub fn window_dates(end: NaiveDate, days: usize) -> CoreResult<Vec<NaiveDate>> {
    Ok(match window_bounds(end, days)? {
        Some((start, _)) => start.iter_days().take(days).collect(),
        None => Vec::new(),
    })
}

/// First Sunday and last Saturday of the `weeks` most recent Sunday-first
/// weeks, the newest being the week holding `today`.
pub fn week_window(today: NaiveDate, weeks: usize) -> CoreResult<Option<(NaiveDate, NaiveDate)>> {
    if weeks == 0 {
        return Ok(None);
    }
    let current = sunday_on_or_before(today);
    let start = days_before(current, (weeks as u64 - 1).saturating_mul(7))?;
    let end = current.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    Ok(Some((start, end)))
}

/// Parses a duration into minutes: `45m`, `1.5h`, or a bare number of minutes.
pub fn parse_duration(input: &str) -> Result<f64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty duration string"));
    }

    let (num_str, factor) = match input.chars().last() {
        Some(c) if c.eq_ignore_ascii_case(&'m') => (&input[..input.len() - 1], 1.0),
        Some(c) if c.eq_ignore_ascii_case(&'h') => (&input[..input.len() - 1], 60.0),
        Some(c) if c.is_ascii_digit() || c == '.' => (input, 1.0),
        Some(c) => return Err(anyhow!("Unknown duration unit: {}", c)),
        None => return Err(anyhow!("Empty duration string")),
    };

    let num: f64 = num_str.trim().parse().map_err(|_| anyhow!("Invalid duration number: {}", num_str))?;
    let minutes = num * factor;
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(anyhow!("Duration must be positive: {}", input));
    }
    Ok(minutes)
}

pub fn parse_human_date(input: &str) -> Result<NaiveDate> {
    parse_human_date_from(input, today())
}

/// Resolves a human date relative to `today`. Everything resolves to today
/// or the past, since activities are logged after the fact.
pub fn parse_human_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" | "y" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (-Nd, -Nw)
    if let Some(rest) = input.strip_prefix('-') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (split, _) = rest
            .char_indices()
            .last()
            .ok_or_else(|| anyhow!("Invalid relative format: {}", input))?;
        let (num_str, unit) = rest.split_at(split);
        let count: u64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;
        let days = match unit {
            "d" => count,
            "w" => count
                .checked_mul(7)
                .ok_or_else(|| anyhow!("Relative date too far back: {}", input))?,
            _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
        return Ok(days_before(today, days)?);
    }

    // 3. ISO date
    if let Ok(d) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(d);
    }

    // 4. Weekday format (fri = the most recent Friday, 2:fri = the one before)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            let mut days_back = today.weekday().num_days_from_sunday() as i64
                - target.num_days_from_sunday() as i64;
            if days_back <= 0 {
                days_back += 7;
            }
            let days_back = (count.max(1) as u64 - 1)
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_back as u64))
                .ok_or_else(|| anyhow!("Relative date too far back: {}", input))?;
            return Ok(days_before(today, days_back)?);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
