use crate::error::CoreResult;
use crate::service::dto::CalendarCell;
use crate::service::score::ScoreMap;
use crate::time::{day_of_week, parse_iso_date, week_index, year_bounds};
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Upper bound (inclusive) of levels 1..=4. Anything above the last is level 5.
pub const LEVEL_THRESHOLDS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];
pub const MAX_LEVEL: u8 = 5;

pub fn level(score: f64) -> u8 {
    if !(score > 0.0) {
        return 0;
    }
    LEVEL_THRESHOLDS
        .iter()
        .position(|upper| score <= *upper)
        .map(|i| i as u8 + 1)
        .unwrap_or(MAX_LEVEL)
}

pub fn layout_cell(date: NaiveDate, score: f64) -> CalendarCell {
    CalendarCell {
        date,
        week_index: week_index(date),
        day_of_week: day_of_week(date),
        score,
        level: level(score),
    }
}

/// Jan 1 ..= Dec 31 of `year`, one cell per date, 0 for dates not in `scores`.
pub fn render_year(scores: &ScoreMap, year: i32) -> CoreResult<Vec<CalendarCell>> {
    let (first, last) = year_bounds(year)?;
    Ok(first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| layout_cell(date, scores.get(date)))
        .collect())
}

/// Builds a score map from `YYYY-MM-DD` keyed pairs.
pub fn parse_score_pairs<'a, I>(pairs: I) -> CoreResult<ScoreMap>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut scores = ScoreMap::new();
    for (date, score) in pairs {
        scores.insert(parse_iso_date(date)?, score);
    }
    Ok(scores)
}

/// Groups cells into Sunday-first week columns. Days outside the year stay `None`.
pub fn week_columns(cells: &[CalendarCell]) -> Vec<[Option<&CalendarCell>; 7]> {
    let width = cells.iter().map(|c| c.week_index as usize + 1).max().unwrap_or(0);
    let mut columns = vec![[None; 7]; width];
    for cell in cells {
        columns[cell.week_index as usize][cell.day_of_week as usize] = Some(cell);
    }
    columns
}

/// Heatmap layout for one rendering session. Keeps the score map it last
/// rendered so single days can be re-levelled without a full render.
#[derive(Debug, Clone, Default)]
pub struct CalendarLayoutEngine {
    year: Option<i32>,
    scores: ScoreMap,
    cells: Vec<CalendarCell>,
}

impl CalendarLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, scores: ScoreMap, year: i32) -> CoreResult<&[CalendarCell]> {
        let cells = render_year(&scores, year)?;
        debug!("rendered calendar {} ({} cells, {} scored days)", year, cells.len(), scores.len());
        self.year = Some(year);
        self.scores = scores;
        self.cells = cells;
        Ok(&self.cells)
    }

    /// Merges `partial` into the retained scores and recomputes only the
    /// cells it touches. Returns the updated cells.
    pub fn update(&mut self, partial: &ScoreMap) -> Vec<CalendarCell> {
        self.scores.merge(partial);

        let mut touched = Vec::new();
        for (date, _) in partial.iter() {
            if self.year != Some(date.year()) {
                continue;
            }
            if let Some(cell) = self.cells.get_mut(date.ordinal0() as usize) {
                cell.score = self.scores.get(date);
                cell.level = level(cell.score);
                touched.push(cell.clone());
            }
        }
        debug!("calendar update touched {} of {} dates", touched.len(), partial.len());
        touched
    }

    /// Like `update`, keyed by date strings. Nothing changes on a bad date.
    pub fn update_from_pairs<'a, I>(&mut self, pairs: I) -> CoreResult<Vec<CalendarCell>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let partial = parse_score_pairs(pairs)?;
        Ok(self.update(&partial))
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        if self.year != Some(date.year()) {
            return None;
        }
        self.cells.get(date.ordinal0() as usize)
    }
}
