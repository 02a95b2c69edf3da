use crate::model::{ActivityEntry, HistorySnapshot, LabelRegistry};
use chrono::NaiveDate;
use log::warn;
use std::collections::BTreeMap;

/// Points one activity contributes: `duration × rate(label)`.
pub fn activity_points(activity: &ActivityEntry, labels: &LabelRegistry) -> f64 {
    if !labels.contains(&activity.label) {
        warn!("activity label '{}' is not registered, scoring it as 0", activity.label);
        return 0.0;
    }
    activity.duration_minutes.max(0.0) * labels.rate(&activity.label)
}

/// A day's score: the sum of its activities' points. Unbounded above.
pub fn calculate_score(activities: &[ActivityEntry], labels: &LabelRegistry) -> f64 {
    activities.iter().map(|a| activity_points(a, labels)).sum()
}

/// Scores every recorded day of the snapshot.
pub fn score_history(history: &HistorySnapshot, labels: &LabelRegistry) -> ScoreMap {
    history
        .recorded()
        .map(|day| (day.date, calculate_score(&day.activities, labels)))
        .collect()
}

/// Date -> score. Missing dates read as 0; stored values are never negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMap {
    scores: BTreeMap<NaiveDate, f64>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> f64 {
        self.scores.get(&date).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.scores.contains_key(&date)
    }

    pub fn insert(&mut self, date: NaiveDate, score: f64) {
        self.scores.insert(date, sanitize(score));
    }

    /// New keys overwrite, the rest stay as they are.
    pub fn merge(&mut self, other: &ScoreMap) {
        for (date, score) in other.iter() {
            self.insert(date, score);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.scores.iter().map(|(d, s)| (*d, *s))
    }

    /// Entries within `start..=end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.scores.range(start..=end).map(|(d, s)| (*d, *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(NaiveDate, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut map = ScoreMap::new();
        for (date, score) in iter {
            map.insert(date, score);
        }
        map
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}
