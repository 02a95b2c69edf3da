use crate::error::CoreResult;
use crate::model::HistorySnapshot;
use crate::service::dto::{PeriodStats, RangeCalendar};
use crate::service::score::ScoreMap;
use crate::service::trend::{mean, trend_percentage};
use crate::time::window_dates;
use chrono::NaiveDate;

/// Figures over the `days` most recent days ending at `today`. Days without
/// activity count as zero-score days everywhere, including the average.
pub fn summarize(
    history: &HistorySnapshot,
    scores: &ScoreMap,
    today: NaiveDate,
    days: usize,
) -> CoreResult<PeriodStats> {
    let dates = window_dates(today, days)?;
    if dates.is_empty() {
        return Ok(PeriodStats::default());
    }

    let daily_scores: Vec<f64> = dates.iter().map(|d| scores.get(*d)).collect();
    let productive_days = daily_scores.iter().filter(|s| **s > 0.0).count();
    let total_activities = dates.iter().map(|d| history.activities(*d).len()).sum();

    Ok(PeriodStats {
        period_days: days,
        productive_days,
        avg_daily_score: mean(&daily_scores),
        max_score: daily_scores.iter().copied().fold(0.0, f64::max),
        min_score: daily_scores.iter().copied().fold(f64::INFINITY, f64::min),
        total_score: daily_scores.iter().sum(),
        total_activities,
        trend_percentage: trend_percentage(&daily_scores),
        productivity_rate: productive_days as f64 / days as f64 * 100.0,
        daily_scores,
    })
}

/// Recorded scores within `start..=end` and figures over those days only.
pub fn range_calendar(scores: &ScoreMap, start: NaiveDate, end: NaiveDate) -> RangeCalendar {
    let calendar_data: Vec<(NaiveDate, f64)> = scores.range(start, end).collect();
    let values: Vec<f64> = calendar_data.iter().map(|(_, s)| *s).collect();

    RangeCalendar {
        total_days: values.len(),
        productive_days: values.iter().filter(|s| **s > 0.0).count(),
        max_score: values.iter().copied().fold(0.0, f64::max),
        avg_score: mean(&values),
        calendar_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityEntry, DayRecord};
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summarize_week_with_idle_start() {
        let today = d(2024, 3, 7);
        let start = today - Duration::days(6);
        // days 1-3 idle, days 4-7 score 50
        let scores: ScoreMap = (3..7).map(|i| (start + Duration::days(i), 50.0)).collect();
        let history = HistorySnapshot::empty(start, today);

        let stats = summarize(&history, &scores, today, 7).unwrap();
        assert_eq!(stats.period_days, 7);
        assert_eq!(stats.productive_days, 4);
        assert!(approx(stats.avg_daily_score, 200.0 / 7.0));
        assert!((stats.avg_daily_score - 28.57).abs() < 0.01);
        assert_eq!(stats.max_score, 50.0);
        assert_eq!(stats.min_score, 0.0);
        assert!(approx(stats.total_score, 200.0));
        assert!(approx(stats.productivity_rate, 400.0 / 7.0));
        // older half [0, 0, 0] averages 0
        assert_eq!(stats.trend_percentage, 0.0);
        assert_eq!(stats.daily_scores.len(), 7);
    }

    #[test]
    fn test_summarize_counts_activities_and_trend() {
        let today = d(2024, 3, 4);
        let start = d(2024, 3, 1);
        let history = HistorySnapshot::new(
            start,
            today,
            vec![
                DayRecord::with_activities(start, vec![ActivityEntry::new("x", 1.0), ActivityEntry::new("y", 1.0)]),
                DayRecord::with_activities(today, vec![ActivityEntry::new("x", 1.0)]),
            ],
        );
        let scores: ScoreMap = vec![(d(2024, 3, 1), 10.0), (d(2024, 3, 2), 10.0), (d(2024, 3, 3), 20.0), (today, 20.0)]
            .into_iter()
            .collect();
        let stats = summarize(&history, &scores, today, 4).unwrap();
        assert_eq!(stats.total_activities, 3);
        assert!(approx(stats.trend_percentage, 100.0));
        assert_eq!(stats.min_score, 10.0);
    }

    #[test]
    fn test_summarize_empty_history() {
        let today = d(2024, 3, 4);
        let stats = summarize(&HistorySnapshot::empty(today, today), &ScoreMap::new(), today, 30).unwrap();
        assert_eq!(stats.period_days, 30);
        assert_eq!(stats.productive_days, 0);
        assert_eq!(stats.max_score, 0.0);
        assert_eq!(stats.avg_daily_score, 0.0);
        assert_eq!(stats.productivity_rate, 0.0);
    }

    #[test]
    fn test_summarize_zero_days() {
        let today = d(2024, 3, 4);
        let stats = summarize(&HistorySnapshot::empty(today, today), &ScoreMap::new(), today, 0).unwrap();
        assert_eq!(stats, PeriodStats::default());
    }

    #[test]
    fn test_range_calendar_uses_recorded_days() {
        let scores: ScoreMap = vec![(d(2024, 1, 1), 0.0), (d(2024, 1, 2), 30.0), (d(2024, 2, 1), 90.0)]
            .into_iter()
            .collect();
        let range = range_calendar(&scores, d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(range.total_days, 2);
        assert_eq!(range.productive_days, 1);
        assert_eq!(range.max_score, 30.0);
        assert!(approx(range.avg_score, 15.0));
    }
}
