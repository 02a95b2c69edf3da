use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate, // YYYY-MM-DD
    pub week_index: u32,
    pub day_of_week: u32, // 0 = Sunday
    pub score: f64,
    pub level: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendView {
    #[default]
    Daily,
    Weekly,
}

impl TrendView {
    pub fn toggle(self) -> Self {
        match self {
            TrendView::Daily => TrendView::Weekly,
            TrendView::Weekly => TrendView::Daily,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub period: NaiveDate, // day, or the Sunday opening the week
    pub label: String,
    pub score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
    pub trend_percentage: f64,
}

impl TrendSeries {
    pub fn from_points(points: &[TrendPoint], trend_percentage: f64) -> Self {
        Self {
            labels: points.iter().map(|p| p.label.clone()).collect(),
            scores: points.iter().map(|p| p.score).collect(),
            trend_percentage,
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityBreakdownRow {
    pub label: String,
    pub time_minutes: f64,
    pub score_points: f64,
    pub activity_count: usize,
    pub color: String,
}

/// Parallel sequences, all the same length and in the same row order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Breakdown {
    pub labels: Vec<String>,
    pub time_data: Vec<f64>,
    pub score_data: Vec<f64>,
    pub colors: Vec<String>,
    pub activity_counts: Vec<usize>,
    pub total_time: f64,
    pub total_score: f64,
}

impl Breakdown {
    pub fn from_rows(rows: Vec<ActivityBreakdownRow>) -> Self {
        let mut breakdown = Breakdown::default();
        for row in rows {
            breakdown.total_time += row.time_minutes;
            breakdown.total_score += row.score_points;
            breakdown.labels.push(row.label);
            breakdown.time_data.push(row.time_minutes);
            breakdown.score_data.push(row.score_points);
            breakdown.colors.push(row.color);
            breakdown.activity_counts.push(row.activity_count);
        }
        breakdown
    }

    pub fn rows(&self) -> Vec<ActivityBreakdownRow> {
        (0..self.labels.len())
            .map(|i| ActivityBreakdownRow {
                label: self.labels[i].clone(),
                time_minutes: self.time_data[i],
                score_points: self.score_data[i],
                activity_count: self.activity_counts[i],
                color: self.colors[i].clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PeriodStats {
    pub period_days: usize,
    pub productive_days: usize,
    pub avg_daily_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub total_score: f64,
    pub total_activities: usize,
    pub trend_percentage: f64,
    pub productivity_rate: f64,
    pub daily_scores: Vec<f64>,
}

/// Score map of a date range plus figures over its recorded days.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RangeCalendar {
    pub calendar_data: Vec<(NaiveDate, f64)>,
    pub total_days: usize,
    pub productive_days: usize,
    pub max_score: f64,
    pub avg_score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityDetail {
    pub id: Uuid,
    pub label: String,
    pub duration_minutes: f64,
    pub rate: f64,
    pub points: f64,
    pub known_label: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayDetails {
    pub date: NaiveDate,
    pub activities: Vec<ActivityDetail>,
    pub total_minutes: f64,
    pub total_score: f64,
    pub level: u8,
}
