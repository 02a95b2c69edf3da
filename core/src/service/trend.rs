use crate::error::CoreResult;
use crate::service::dto::{TrendPoint, TrendSeries, TrendView};
use crate::service::score::ScoreMap;
use crate::time::{format_date, week_window, window_dates};
use chrono::{Duration, NaiveDate};

/// Exactly `days` points, one per calendar day ending at `today`, oldest first.
pub fn daily_trend(scores: &ScoreMap, today: NaiveDate, days: usize) -> CoreResult<Vec<TrendPoint>> {
    Ok(window_dates(today, days)?
        .into_iter()
        .map(|date| TrendPoint {
            period: date,
            label: format_date(date),
            score: scores.get(date),
        })
        .collect())
}

/// Summed daily scores of the `weeks` most recent Sunday-aligned weeks,
/// oldest first. The week containing `today` is the newest point.
pub fn weekly_trend(scores: &ScoreMap, today: NaiveDate, weeks: usize) -> CoreResult<Vec<TrendPoint>> {
    let Some((first, _)) = week_window(today, weeks)? else {
        return Ok(Vec::new());
    };
    Ok((0..weeks)
        .map(|offset| {
            let start = first + Duration::weeks(offset as i64);
            let end = start + Duration::days(6);
            TrendPoint {
                period: start,
                label: format_date(start),
                score: scores.range(start, end).map(|(_, s)| s).sum(),
            }
        })
        .collect())
}

/// Relative change, in percent, from the older half of `series` to the newer
/// half. An odd middle point belongs to the newer half. 0 when the older
/// half averages 0 or there is nothing to compare.
pub fn trend_percentage(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let (older, newer) = series.split_at(series.len() / 2);
    let older_avg = mean(older);
    let newer_avg = mean(newer);
    if older_avg == 0.0 {
        return 0.0;
    }
    let pct = (newer_avg - older_avg) / older_avg * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

pub fn trend_series(
    scores: &ScoreMap,
    today: NaiveDate,
    view: TrendView,
    count: usize,
) -> CoreResult<TrendSeries> {
    let points = match view {
        TrendView::Daily => daily_trend(scores, today, count)?,
        TrendView::Weekly => weekly_trend(scores, today, count)?,
    };
    let values: Vec<f64> = points.iter().map(|p| p.score).collect();
    Ok(TrendSeries::from_points(&points, trend_percentage(&values)))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_daily_trend_always_n_points() {
        let today = d(2024, 5, 15);
        for n in [0, 1, 7, 30, 400] {
            let points = daily_trend(&ScoreMap::new(), today, n).unwrap();
            assert_eq!(points.len(), n);
            assert!(points.iter().all(|p| p.score == 0.0));
        }
    }

    #[test]
    fn test_daily_trend_order_and_values() {
        let today = d(2024, 5, 15);
        let scores: ScoreMap = vec![(d(2024, 5, 13), 40.0), (d(2024, 5, 15), 10.0), (d(2024, 5, 16), 99.0)]
            .into_iter()
            .collect();
        let points = daily_trend(&scores, today, 3).unwrap();
        let values: Vec<f64> = points.iter().map(|p| p.score).collect();
        assert_eq!(values, vec![40.0, 0.0, 10.0]);
        assert_eq!(points[0].label, "2024-05-13");
        assert_eq!(points[2].period, today);
    }

    #[test]
    fn test_weekly_trend_sums_sunday_weeks() {
        // 2024-05-15 is a Wednesday; its week opens Sunday 2024-05-12
        let today = d(2024, 5, 15);
        let scores: ScoreMap = vec![
            (d(2024, 5, 11), 5.0),  // Saturday, previous week
            (d(2024, 5, 12), 10.0), // Sunday
            (d(2024, 5, 14), 20.0),
            (d(2024, 5, 4), 7.0),   // two weeks back
        ]
        .into_iter()
        .collect();
        let points = weekly_trend(&scores, today, 3).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].period, d(2024, 5, 12));
        assert_eq!(points[1].period, d(2024, 5, 5));
        assert_eq!(points[0].period, d(2024, 4, 28));
        assert!(approx(points[2].score, 30.0));
        assert!(approx(points[1].score, 5.0));
        assert!(approx(points[0].score, 7.0));
    }

    #[test]
    fn test_trend_percentage_halves() {
        assert!(approx(trend_percentage(&[10.0, 10.0, 20.0, 20.0]), 100.0));
        assert!(approx(trend_percentage(&[20.0, 20.0, 10.0, 10.0]), -50.0));
        // odd length: middle point joins the newer half
        assert!(approx(trend_percentage(&[10.0, 10.0, 40.0, 10.0, 10.0]), 100.0));
    }

    #[test]
    fn test_trend_percentage_degenerate() {
        assert_eq!(trend_percentage(&[]), 0.0);
        assert_eq!(trend_percentage(&[5.0]), 0.0);
        assert_eq!(trend_percentage(&[0.0, 0.0, 0.0, 0.0]), 0.0);
        assert_eq!(trend_percentage(&[0.0, 0.0, 50.0, 80.0]), 0.0);
    }

    #[test]
    fn test_trend_series_view_switch() {
        let today = d(2024, 5, 15);
        let daily = trend_series(&ScoreMap::new(), today, TrendView::Daily, 30).unwrap();
        let weekly = trend_series(&ScoreMap::new(), today, TrendView::Weekly, 12).unwrap();
        assert_eq!(daily.labels.len(), daily.scores.len());
        assert_eq!(daily.len(), 30);
        assert_eq!(weekly.len(), 12);
    }

    #[test]
    fn test_oversized_windows_are_invalid_dates() {
        let today = d(2024, 5, 15);
        assert!(weekly_trend(&ScoreMap::new(), today, 100_000_000).unwrap_err().is_invalid_date());
        assert!(daily_trend(&ScoreMap::new(), today, 1_000_000_000).unwrap_err().is_invalid_date());
        assert!(weekly_trend(&ScoreMap::new(), today, 0).unwrap().is_empty());
    }
}
