use crate::error::CoreResult;
use crate::model::{HistorySnapshot, LabelRegistry};
use crate::service::dto::{ActivityBreakdownRow, Breakdown};
use crate::service::score::activity_points;
use crate::time::window_dates;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Default)]
struct LabelTotals {
    time: f64,
    score: f64,
    count: usize,
}

/// Time and score per label over the `days` most recent days ending at
/// `today`. Rows run by score descending, then label name ascending.
pub fn activity_breakdown(
    history: &HistorySnapshot,
    labels: &LabelRegistry,
    today: NaiveDate,
    days: usize,
) -> CoreResult<Breakdown> {
    let mut totals: BTreeMap<&str, LabelTotals> = BTreeMap::new();

    for date in window_dates(today, days)? {
        for activity in history.activities(date) {
            let entry = totals.entry(activity.label.as_str()).or_default();
            entry.time += activity.duration_minutes;
            entry.score += activity_points(activity, labels);
            entry.count += 1;
        }
    }

    let mut rows: Vec<ActivityBreakdownRow> = totals
        .into_iter()
        .map(|(label, t)| ActivityBreakdownRow {
            label: label.to_string(),
            time_minutes: t.time,
            score_points: t.score,
            activity_count: t.count,
            color: labels.color(label).to_string(),
        })
        .collect();
    rows.sort_by(compare_rows);

    Ok(Breakdown::from_rows(rows))
}

fn compare_rows(a: &ActivityBreakdownRow, b: &ActivityBreakdownRow) -> Ordering {
    b.score_points
        .total_cmp(&a.score_points)
        .then_with(|| a.label.cmp(&b.label))
}
